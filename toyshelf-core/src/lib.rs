//! Query composition and retrieval for a collection of toy listings.
//!
//! This crate is the core of the toyshelf project and provides:
//!
//! - **Toy model** ([`toy`]) - Field names and a typed read view of stored toys
//! - **Store backend abstraction** ([`backend`]) - The one-round-trip store interface
//! - **Query API** ([`query`]) - Backend-neutral filter, sort and limit
//! - **Request input** ([`request`]) - Parsed parameters, optional clauses and operations
//! - **Filter Builder** ([`filter`]), **Sort Resolver** ([`sort`]),
//!   **Result Limiter** ([`limit`]) and **Mutation Validator** ([`mutation`])
//! - **Engine** ([`engine`]) - Composes the above into the toy operations
//! - **Configuration** ([`config`]) and **error handling** ([`error`])
//!
//! # Example
//!
//! ```ignore
//! use toyshelf::{prelude::*, memory::InMemoryStore};
//!
//! let engine = ToyEngine::new(InMemoryStore::new());
//! let newest = engine.list_all().await?;
//! let mine = engine
//!     .list_by_owner_query(Clause::Present("a@x.com".into()), Clause::Present("true".into()))
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as toyshelf_core;

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod limit;
pub mod mutation;
pub mod query;
pub mod request;
pub mod sort;
pub mod toy;
