//! In-memory storage implementation for the toy collection.
//!
//! Documents are kept per collection in insertion order, which is the natural
//! order unsorted queries return.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document, doc, oid::ObjectId};
use tracing::debug;

use toyshelf_core::{
    backend::{DeleteAck, InsertAck, StoreBackend, StoreBackendBuilder, UpdateAck},
    error::ToyStoreResult,
    query::{Expr, Query, SortDirection},
};

use crate::evaluator::{DocumentEvaluator, Comparable};

type StoreMap = HashMap<String, Vec<Document>>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so
/// clones share the same data and can be handed to concurrent tasks.
///
/// Queries scan the whole collection; indexes are accepted and ignored.
///
/// # Example
///
/// ```ignore
/// use toyshelf_memory::InMemoryStore;
/// use toyshelf::backend::StoreBackend;
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let ack = store.insert_document(doc! { "toyName": "Red Car" }, "allToys").await?;
/// assert!(ack.object_id().is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, document: Document, collection: &str) -> ToyStoreResult<InsertAck> {
        let id = document
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));

        // `_id` leads, as it does in MongoDB
        let mut stored = doc! { "_id": id.clone() };
        stored.extend(document.into_iter().filter(|(key, _)| key != "_id"));

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(stored);

        debug!(collection, %id, "inserted document");

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: Some(id),
        })
    }

    async fn find_documents(&self, query: Query, collection: &str) -> ToyStoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let documents = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut matched = documents
            .iter()
            .filter(|doc| DocumentEvaluator::matches(doc, query.filter.as_ref()))
            .cloned()
            .collect::<Vec<_>>();

        // Stable, so ties keep insertion order
        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| {
                let left = Comparable::field(a, &sort.field);
                let right = Comparable::field(b, &sort.field);

                match sort.direction {
                    SortDirection::Asc => left.sort_cmp(&right),
                    SortDirection::Desc => right.sort_cmp(&left),
                }
            });
        }

        Ok(
            matched
                .into_iter()
                .take(query.limit.unwrap_or(usize::MAX))
                .collect()
        )
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> ToyStoreResult<Option<Document>> {
        Ok(
            self.store
                .read()
                .await
                .get(collection)
                .and_then(|documents| {
                    documents
                        .iter()
                        .find(|doc| DocumentEvaluator::matches(doc, Some(&filter)))
                        .cloned()
                })
        )
    }

    async fn update_one(&self, filter: Expr, set: Document, collection: &str) -> ToyStoreResult<UpdateAck> {
        let mut store = self.store.write().await;
        let target = store
            .get_mut(collection)
            .and_then(|documents| {
                documents
                    .iter_mut()
                    .find(|doc| DocumentEvaluator::matches(doc, Some(&filter)))
            });

        let Some(document) = target else {
            return Ok(UpdateAck { acknowledged: true, matched_count: 0, modified_count: 0 });
        };

        let mut modified = false;

        for (field, value) in set {
            if document.get(&field) != Some(&value) {
                document.insert(field, value);
                modified = true;
            }
        }

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> ToyStoreResult<DeleteAck> {
        let mut store = self.store.write().await;
        let position = store
            .get(collection)
            .and_then(|documents| {
                documents
                    .iter()
                    .position(|doc| DocumentEvaluator::matches(doc, Some(&filter)))
            });

        let deleted_count = match (position, store.get_mut(collection)) {
            (Some(index), Some(documents)) => {
                documents.remove(index);
                1
            }
            _ => 0,
        };

        Ok(DeleteAck { acknowledged: true, deleted_count })
    }

    async fn add_index(&self, collection: &str, _field: &str, _name: &str, _unique: bool) -> ToyStoreResult<()> {
        // No indexes in memory; make sure the collection exists
        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default();

        Ok(())
    }

    async fn ping(&self) -> ToyStoreResult<()> {
        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    async fn build(self) -> ToyStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use toyshelf_core::query::{Filter, Sort};

    const TOYS: &str = "allToys";

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::builder().build().await.unwrap();

        for (name, price) in [("Red Car", 10), ("Blue Truck", 30), ("Green Car", 20)] {
            store
                .insert_document(doc! { "toyName": name, "price": price }, TOYS)
                .await
                .unwrap();
        }

        store
    }

    #[tokio::test]
    async fn insert_assigns_fresh_ids() {
        let store = InMemoryStore::new();
        let first = store.insert_document(doc! {}, TOYS).await.unwrap();
        let second = store.insert_document(doc! {}, TOYS).await.unwrap();

        assert!(first.object_id().is_some());
        assert_ne!(first.object_id(), second.object_id());
    }

    #[tokio::test]
    async fn id_is_the_first_stored_field() {
        let store = InMemoryStore::new();
        store
            .insert_document(doc! { "toyName": "Red Car", "price": 10 }, TOYS)
            .await
            .unwrap();

        let stored = store.find_documents(Query::new(), TOYS).await.unwrap();
        let keys = stored[0].keys().map(String::as_str).collect::<Vec<_>>();

        assert_eq!(keys, vec!["_id", "toyName", "price"]);
    }

    #[tokio::test]
    async fn unsorted_queries_keep_insertion_order() {
        let store = seeded().await;
        let names = store
            .find_documents(Query::new(), TOYS)
            .await
            .unwrap()
            .iter()
            .map(|doc| doc.get_str("toyName").unwrap().to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Red Car", "Blue Truck", "Green Car"]);
    }

    #[tokio::test]
    async fn limit_applies_after_sort() {
        let store = seeded().await;
        let query = Query {
            filter: None,
            limit: Some(2),
            sort: Some(Sort::new("price", SortDirection::Desc)),
        };

        let prices = store
            .find_documents(query, TOYS)
            .await
            .unwrap()
            .iter()
            .map(|doc| doc.get_i32("price").unwrap())
            .collect::<Vec<_>>();

        assert_eq!(prices, vec![30, 20]);
    }

    #[tokio::test]
    async fn missing_collection_is_empty() {
        let store = InMemoryStore::new();

        assert!(store.find_documents(Query::new(), "nothing").await.unwrap().is_empty());
        assert_eq!(store.find_one(Filter::eq("price", 1), "nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_reports_matched_and_modified() {
        let store = seeded().await;
        let filter = Filter::eq("toyName", "Red Car");

        let changed = store
            .update_one(filter.clone(), doc! { "price": 11 }, TOYS)
            .await
            .unwrap();
        let unchanged = store
            .update_one(filter, doc! { "price": 11 }, TOYS)
            .await
            .unwrap();
        let missing = store
            .update_one(Filter::eq("toyName", "Kite"), doc! { "price": 1 }, TOYS)
            .await
            .unwrap();

        assert_eq!((changed.matched_count, changed.modified_count), (1, 1));
        assert_eq!((unchanged.matched_count, unchanged.modified_count), (1, 0));
        assert_eq!((missing.matched_count, missing.modified_count), (0, 0));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = seeded().await;
        let filter = Filter::eq("toyName", "Blue Truck");

        let first = store.delete_one(filter.clone(), TOYS).await.unwrap();
        let second = store.delete_one(filter, TOYS).await.unwrap();

        assert_eq!(first.deleted_count, 1);
        assert_eq!(second.deleted_count, 0);
        assert_eq!(store.count(TOYS).await, 2);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryStore::new();
        let clone = store.clone();

        clone.insert_document(doc! { "toyName": "Kite" }, TOYS).await.unwrap();

        assert_eq!(store.count(TOYS).await, 1);
    }
}
