//! The toy query engine.
//!
//! [`ToyEngine`] owns a store handle and composes each operation from the
//! [`FilterBuilder`], [`SortResolver`], [`ResultLimiter`] and
//! [`MutationValidator`], then issues exactly one store round trip. It holds no
//! per-request state, so one engine serves every concurrent request.
//!
//! ```ignore
//! use toyshelf::{prelude::*, memory::InMemoryStore};
//!
//! let engine = ToyEngine::new(InMemoryStore::new());
//! let ack = engine.create(&json!({ "toyName": "Red Car", "sellerEmail": "a@x.com" })).await?;
//! let toy = engine.get_by_id(&ack.object_id().unwrap().to_hex()).await?;
//! ```

use bson::{Bson, Document};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    backend::{DeleteAck, InsertAck, StoreBackend, UpdateAck},
    config::StoreConfig,
    error::ToyStoreResult,
    filter::FilterBuilder,
    limit::ResultLimiter,
    mutation::MutationValidator,
    query::Query,
    request::{Clause, Operation, Request, params},
    sort::SortResolver,
    toy::{COLLECTION, fields},
};

/// Name of the search index on `toyName`.
pub const TOY_NAME_INDEX: &str = "toyName";

/// Result of a dispatched operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Toys(Vec<Document>),
    Toy(Option<Document>),
    Inserted(InsertAck),
    Updated(UpdateAck),
    Deleted(DeleteAck),
}

impl Response {
    /// The JSON body a boundary layer sends back. A missing toy is `null`,
    /// identifiers are hex strings and timestamps are RFC 3339 strings.
    pub fn into_json(self) -> ToyStoreResult<Value> {
        Ok(match self {
            Response::Toys(toys) => Value::Array(
                toys.into_iter()
                    .map(|toy| plain_json(Bson::Document(toy)))
                    .collect::<ToyStoreResult<_>>()?
            ),
            Response::Toy(toy) => match toy {
                Some(toy) => plain_json(Bson::Document(toy))?,
                None => Value::Null,
            },
            Response::Inserted(ack) => {
                let mut value = serde_json::to_value(&ack)?;
                if let Some(id) = ack.inserted_id {
                    value["insertedId"] = plain_json(id)?;
                }
                value
            }
            Response::Updated(ack) => serde_json::to_value(ack)?,
            Response::Deleted(ack) => serde_json::to_value(ack)?,
        })
    }
}

/// Plain JSON for a stored value, without extended-JSON wrappers for
/// `ObjectId` and `DateTime`.
fn plain_json(bson: Bson) -> ToyStoreResult<Value> {
    Ok(match bson {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(at) => Value::String(at.try_to_rfc3339_string()?),
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| Ok((key, plain_json(value)?)))
                .collect::<ToyStoreResult<_>>()?
        ),
        Bson::Array(items) => Value::Array(
            items
                .into_iter()
                .map(plain_json)
                .collect::<ToyStoreResult<_>>()?
        ),
        other => serde_json::to_value(other)?,
    })
}

#[derive(Debug)]
pub struct ToyEngine<B: StoreBackend> {
    backend: B,
    collection: String,
    limiter: ResultLimiter,
}

impl<B: StoreBackend> ToyEngine<B> {
    /// Creates an engine over the default `allToys` collection.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            collection: COLLECTION.to_string(),
            limiter: ResultLimiter::default(),
        }
    }

    /// Creates an engine using the collection and list cap from `config`.
    pub fn with_config(backend: B, config: &StoreConfig) -> ToyStoreResult<Self> {
        config.validate()?;

        Ok(Self {
            backend,
            collection: config.collection.clone(),
            limiter: ResultLimiter::new(config.list_limit),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// Creates the non-unique `toyName` index used by search.
    pub async fn ensure_indexes(&self) -> ToyStoreResult<()> {
        self.backend
            .add_index(&self.collection, fields::TOY_NAME, TOY_NAME_INDEX, false)
            .await?;

        info!(collection = %self.collection, index = TOY_NAME_INDEX, "index ensured");

        Ok(())
    }

    pub async fn ping(&self) -> ToyStoreResult<()> {
        self.backend.ping().await
    }

    /// Up to the list cap of toys, newest first.
    pub async fn list_all(&self) -> ToyStoreResult<Vec<Document>> {
        self.find(
            Query::builder()
                .filter(FilterBuilder::all())
                .sort_by(Some(SortResolver::list_all()))
                .limit(self.limiter.list_all())
                .build(),
        )
        .await
    }

    /// A single toy, or `None` when the id is well-formed but unknown.
    pub async fn get_by_id(&self, id: &str) -> ToyStoreResult<Option<Document>> {
        let filter = FilterBuilder::by_id(id)?;

        debug!(collection = %self.collection, ?filter, "find one");

        self.backend
            .find_one(filter, &self.collection)
            .await
    }

    /// Toys whose name contains `text`, ignoring case. Unordered and unbounded.
    pub async fn search_by_name(&self, text: &str) -> ToyStoreResult<Vec<Document>> {
        self.find(
            Query::builder()
                .filter(FilterBuilder::by_name(text))
                .sort_by(SortResolver::unordered())
                .limit(self.limiter.unbounded())
                .build(),
        )
        .await
    }

    /// Toys owned by exactly `email`.
    pub async fn list_by_owner(&self, email: &str) -> ToyStoreResult<Vec<Document>> {
        self.find(
            Query::builder()
                .filter(FilterBuilder::by_owner(email))
                .sort_by(SortResolver::unordered())
                .limit(self.limiter.unbounded())
                .build(),
        )
        .await
    }

    /// Toys for an optional owner, sorted by price.
    pub async fn list_by_owner_query(
        &self,
        email: Clause<String>,
        is_ascending: Clause<String>,
    ) -> ToyStoreResult<Vec<Document>> {
        self.find(
            Query::builder()
                .filter(FilterBuilder::by_owner_query(email))
                .sort_by(Some(SortResolver::owner_query(&is_ascending)))
                .limit(self.limiter.unbounded())
                .build(),
        )
        .await
    }

    /// Toys in a category. Filters only when both parts are given.
    pub async fn list_by_category(
        &self,
        value: Clause<String>,
        label: Clause<String>,
    ) -> ToyStoreResult<Vec<Document>> {
        self.find(
            Query::builder()
                .filter(FilterBuilder::by_category(value, label))
                .sort_by(SortResolver::unordered())
                .limit(self.limiter.unbounded())
                .build(),
        )
        .await
    }

    /// Stores `payload` stamped with the current server time.
    pub async fn create(&self, payload: &Value) -> ToyStoreResult<InsertAck> {
        let document = MutationValidator::prepare_insert(payload, Utc::now())?;
        let ack = self.backend
            .insert_document(document, &self.collection)
            .await?;

        MutationValidator::confirm_insert(ack).inspect_err(|_| {
            warn!(collection = %self.collection, "insert acknowledged without an identifier");
        })
    }

    /// Replaces price, quantity, description and image, clearing the ones
    /// `payload` omits.
    pub async fn update(&self, id: &str, payload: Option<&Value>) -> ToyStoreResult<UpdateAck> {
        let filter = FilterBuilder::by_id(id)?;
        let set = MutationValidator::prepare_update(payload)?;

        debug!(collection = %self.collection, ?filter, ?set, "update one");

        self.backend
            .update_one(filter, set, &self.collection)
            .await
    }

    /// Deletes one toy. An unknown id reports zero deleted.
    pub async fn delete(&self, id: &str) -> ToyStoreResult<DeleteAck> {
        let filter = FilterBuilder::by_id(id)?;

        debug!(collection = %self.collection, ?filter, "delete one");

        self.backend
            .delete_one(filter, &self.collection)
            .await
    }

    /// Runs `operation` with parameters taken from `request`.
    pub async fn dispatch(&self, operation: Operation, request: &Request) -> ToyStoreResult<Response> {
        debug!(?operation, mutation = operation.is_mutation(), "dispatch");

        Ok(match operation {
            Operation::ListAll => Response::Toys(self.list_all().await?),
            Operation::GetById => Response::Toy(
                self.get_by_id(request.path_param(params::ID)?).await?
            ),
            Operation::SearchByName => Response::Toys(
                self.search_by_name(request.path_param(params::TEXT)?).await?
            ),
            Operation::ListByOwner => Response::Toys(
                self.list_by_owner(request.path_param(params::EMAIL)?).await?
            ),
            Operation::ListByOwnerQuery => Response::Toys(
                self.list_by_owner_query(
                    request.query_clause(params::SELLER_EMAIL),
                    request.query_clause(params::IS_ASCENDING),
                )
                .await?
            ),
            Operation::ListByCategory => Response::Toys(
                self.list_by_category(
                    request.query_clause(params::VALUE),
                    request.query_clause(params::LABEL),
                )
                .await?
            ),
            Operation::Create => {
                let empty = Value::Object(Default::default());

                Response::Inserted(self.create(request.body.as_ref().unwrap_or(&empty)).await?)
            }
            Operation::Update => Response::Updated(
                self.update(request.path_param(params::ID)?, request.body.as_ref()).await?
            ),
            Operation::Delete => Response::Deleted(
                self.delete(request.path_param(params::ID)?).await?
            ),
        })
    }

    pub async fn shutdown(self) -> ToyStoreResult<()> {
        self.backend.shutdown().await
    }

    async fn find(&self, query: Query) -> ToyStoreResult<Vec<Document>> {
        debug!(collection = %self.collection, ?query, "find");

        self.backend
            .find_documents(query, &self.collection)
            .await
    }
}
