//! Storage backend abstraction for the toy collection.
//!
//! The [`StoreBackend`] trait is the single seam between the query engine and a
//! concrete document store. Every method is one round trip; implementations must
//! be `Send + Sync` since one handle is shared by all in-flight requests.
//!
//! ```ignore
//! use toyshelf::backend::StoreBackend;
//! use bson::doc;
//!
//! let ack = backend.insert_document(doc! { "toyName": "Red Car" }, "allToys").await?;
//! assert!(ack.inserted_id.is_some());
//! ```

use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use serde::Serialize;
use std::fmt::Debug;

use crate::{
    error::ToyStoreResult,
    query::{Expr, Query},
};

/// Store acknowledgment of a single-document insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    /// Identifier assigned by the store, if any.
    pub inserted_id: Option<Bson>,
}

impl InsertAck {
    /// Returns the assigned identifier when it is an `ObjectId`.
    pub fn object_id(&self) -> Option<ObjectId> {
        match &self.inserted_id {
            Some(Bson::ObjectId(id)) => Some(*id),
            _ => None,
        }
    }
}

/// Store acknowledgment of a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Store acknowledgment of a single-document delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Abstract interface for document storage backends.
///
/// Documents are plain BSON documents keyed by `_id`. The backend assigns `_id`
/// on insert; callers never supply one.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts one document and reports the identifier the store assigned.
    async fn insert_document(
        &self,
        document: Document,
        collection: &str,
    ) -> ToyStoreResult<InsertAck>;

    /// Runs a filtered, optionally sorted and capped find.
    async fn find_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> ToyStoreResult<Vec<Document>>;

    /// Returns the first document matching `filter`, in natural order.
    async fn find_one(
        &self,
        filter: Expr,
        collection: &str,
    ) -> ToyStoreResult<Option<Document>>;

    /// Sets every field of `set` on the first document matching `filter`.
    async fn update_one(
        &self,
        filter: Expr,
        set: Document,
        collection: &str,
    ) -> ToyStoreResult<UpdateAck>;

    /// Deletes the first document matching `filter`. Deleting nothing is not an error.
    async fn delete_one(&self, filter: Expr, collection: &str) -> ToyStoreResult<DeleteAck>;

    /// Creates a single-field ascending index named `name`.
    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        name: &str,
        unique: bool,
    ) -> ToyStoreResult<()>;

    /// Confirms the store is reachable.
    async fn ping(&self) -> ToyStoreResult<()>;

    async fn shutdown(self) -> ToyStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert_document(
        &self,
        document: Document,
        collection: &str,
    ) -> ToyStoreResult<InsertAck> {
        (*self)
            .insert_document(document, collection)
            .await
    }

    async fn find_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> ToyStoreResult<Vec<Document>> {
        (*self)
            .find_documents(query, collection)
            .await
    }

    async fn find_one(
        &self,
        filter: Expr,
        collection: &str,
    ) -> ToyStoreResult<Option<Document>> {
        (*self)
            .find_one(filter, collection)
            .await
    }

    async fn update_one(
        &self,
        filter: Expr,
        set: Document,
        collection: &str,
    ) -> ToyStoreResult<UpdateAck> {
        (*self)
            .update_one(filter, set, collection)
            .await
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> ToyStoreResult<DeleteAck> {
        (*self)
            .delete_one(filter, collection)
            .await
    }

    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        name: &str,
        unique: bool,
    ) -> ToyStoreResult<()> {
        (*self)
            .add_index(collection, field, name, unique)
            .await
    }

    async fn ping(&self) -> ToyStoreResult<()> {
        (*self).ping().await
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> ToyStoreResult<Self::Backend>;
}
