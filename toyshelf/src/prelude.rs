//! Convenient re-exports of commonly used types from toyshelf.
//!
//! ```ignore
//! use toyshelf::prelude::*;
//! ```
//!
//! This provides access to:
//! - The engine, its response type and the request input types
//! - Store backends and builders
//! - Query construction
//! - The toy model, configuration and error types

pub use toyshelf_core::{
    engine::{ToyEngine, Response},
    request::{Clause, Operation, Request},
    backend::{StoreBackend, StoreBackendBuilder, InsertAck, UpdateAck, DeleteAck},
    query::{Query, QueryVisitor, Expr, Sort, SortDirection, FieldOp, QueryBuilder, Filter},
    toy::{Toy, SubCategory},
    config::StoreConfig,
    error::{ToyStoreError, ToyStoreResult},
};

pub use serde_json::json;
