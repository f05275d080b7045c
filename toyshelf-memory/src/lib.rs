//! In-memory storage backend for toyshelf.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and backs the test suite
//! as well as local development without a database.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Natural order** - Unsorted queries return documents in insertion order
//! - **Case-folded search** - Substring search compares lowercase forms, no pattern engine
//!
//! # Quick Start
//!
//! ```ignore
//! use toyshelf::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = ToyEngine::new(InMemoryStore::builder().build().await?);
//!
//!     engine.create(&json!({ "toyName": "Red Car", "sellerEmail": "a@x.com" })).await?;
//!     assert_eq!(engine.search_by_name("red").await?.len(), 1);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as toyshelf_memory;

pub mod store;
pub(crate) mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
