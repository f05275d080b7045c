//! Main toyshelf crate: query composition and retrieval for toy listings.
//!
//! This crate is the primary entry point. It re-exports the core engine and types
//! and provides access to the storage backends.
//!
//! # Features
//!
//! - **Deterministic queries** - Every operation resolves to one filter, sort and cap
//! - **Permissive optional parameters** - Absent filters widen to "match everything"
//! - **Multiple backends** - In-memory and MongoDB storage behind one trait
//!
//! # Quick Start
//!
//! ```ignore
//! use toyshelf::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> ToyStoreResult<()> {
//!     let engine = ToyEngine::new(InMemoryStore::builder().build().await?);
//!
//!     let ack = engine
//!         .create(&json!({
//!             "toyName": "Red Car",
//!             "sellerEmail": "a@x.com",
//!             "price": 10,
//!             "quantity": 2,
//!         }))
//!         .await?;
//!
//!     let id = ack.object_id().unwrap().to_hex();
//!     let toy = engine.get_by_id(&id).await?;
//!     println!("Created: {:?}", toy);
//!
//!     // Owner's toys, cheapest first
//!     let mine = engine
//!         .list_by_owner_query(Clause::Present("a@x.com".into()), Clause::Present("true".into()))
//!         .await?;
//!     println!("Mine: {:?}", mine);
//!
//!     engine.shutdown().await
//! }
//! ```
//!
//! # Dispatching parsed requests
//!
//! A boundary layer that has already routed and decoded a request hands it over
//! as a [`Request`](request::Request) and sends back the JSON of the response.
//!
//! ```ignore
//! let request = Request::new()
//!     .with_query("value", "sports-car")
//!     .with_query("label", "Sports Car");
//!
//! let body = engine
//!     .dispatch(Operation::ListByCategory, &request)
//!     .await?
//!     .into_json()?;
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use toyshelf_core::{
    backend, config, engine, error, filter, limit, mutation, query, request, sort, toy,
};

// Re-export BSON and JSON types for convenience
pub use bson;
pub use serde_json;

/// In-memory storage backend implementations.
pub mod memory {
    pub use toyshelf_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use toyshelf_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
