use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, doc};
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
};
use tracing::{debug, info};
use toyshelf_core::{
    backend::{DeleteAck, InsertAck, StoreBackend, StoreBackendBuilder, UpdateAck},
    config::StoreConfig,
    error::{ToyStoreError, ToyStoreResult},
    query::{Expr, Query},
};

use crate::query::MongoQueryTranslator;


#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    async fn shutdown(self) -> ToyStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, document: Document, collection: &str) -> ToyStoreResult<InsertAck> {
        let result = self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| ToyStoreError::Backend(e.to_string()))?;

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: Some(result.inserted_id),
        })
    }

    async fn find_documents(&self, query: Query, collection: &str) -> ToyStoreResult<Vec<Document>> {
        let filter = MongoQueryTranslator::filter(query.filter.as_ref())?;
        let options = MongoQueryTranslator::options(&query)?;

        debug!(collection, %filter, sort = ?options.sort, limit = ?options.limit, "find");

        self.get_collection(collection)
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| ToyStoreError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| ToyStoreError::Backend(e.to_string()))
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> ToyStoreResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(MongoQueryTranslator::filter(Some(&filter))?)
            .await
            .map_err(|e| ToyStoreError::Backend(e.to_string()))
    }

    async fn update_one(&self, filter: Expr, set: Document, collection: &str) -> ToyStoreResult<UpdateAck> {
        let result = self.get_collection(collection)
            .update_one(
                MongoQueryTranslator::filter(Some(&filter))?,
                doc! { "$set": set },
            )
            .await
            .map_err(|e| ToyStoreError::Backend(e.to_string()))?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> ToyStoreResult<DeleteAck> {
        let result = self.get_collection(collection)
            .delete_one(MongoQueryTranslator::filter(Some(&filter))?)
            .await
            .map_err(|e| ToyStoreError::Backend(e.to_string()))?;

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn add_index(&self, collection: &str, field: &str, name: &str, unique: bool) -> ToyStoreResult<()> {
        self.get_collection(collection)
            .create_index(
                IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                    .name(name.to_string())
                    .unique(unique)
                    .build()
                )
                .build()
            )
            .await
            .map_err(|e| ToyStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn ping(&self) -> ToyStoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ToyStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn shutdown(self) -> ToyStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    max_pool_size: Option<u32>,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            max_pool_size: None,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.dsn, &config.database)
            .max_pool_size(config.max_pool_size)
    }

    pub fn max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = Some(size);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> ToyStoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| ToyStoreError::Initialization(e.to_string()))?;

        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build()
        );
        if let Some(size) = self.max_pool_size {
            options.max_pool_size = Some(size);
        }

        let client = Client::with_options(options)
            .map_err(|e| ToyStoreError::Initialization(e.to_string()))?;

        info!(database = %self.database, "mongodb client ready");

        Ok(MongoDbStore::new(client, self.database))
    }
}
