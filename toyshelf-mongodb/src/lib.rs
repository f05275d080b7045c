//! MongoDB backend implementation for toyshelf.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! Filters, sorting and the list cap are pushed down to the server in a single find.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! toyshelf = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The client is built from a connection string, directly or through a
//! [`StoreConfig`](toyshelf_core::config::StoreConfig). The driver keeps its own
//! connection pool, so one store handle is shared by every request.
//!
//! # Example
//!
//! ```ignore
//! use toyshelf::{prelude::*, mongodb::MongoDbStoreBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::from_env()?;
//!     let store = MongoDbStoreBuilder::from_config(&config).build().await?;
//!     let engine = ToyEngine::with_config(store, &config)?;
//!
//!     engine.ensure_indexes().await?;
//!     engine.ping().await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as toyshelf_mongodb;

pub mod store;
pub(crate) mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
