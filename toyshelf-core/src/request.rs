//! Already-parsed request input and the operations it can be dispatched to.
//!
//! Routing, body decoding and query-string parsing happen outside this crate.
//! A [`Request`] only carries the result: string-keyed path and query maps plus
//! the decoded JSON body.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{ToyStoreError, ToyStoreResult};

/// Parameter names read by [`crate::engine::ToyEngine::dispatch`].
pub mod params {
    /// Path: toy identifier.
    pub const ID: &str = "id";
    /// Path: search substring.
    pub const TEXT: &str = "text";
    /// Path: owner email.
    pub const EMAIL: &str = "email";
    /// Query: owner email.
    pub const SELLER_EMAIL: &str = "sellerEmail";
    /// Query: `"true"` for ascending price order.
    pub const IS_ASCENDING: &str = "isAscending";
    /// Query: category value.
    pub const VALUE: &str = "value";
    /// Query: category label.
    pub const LABEL: &str = "label";
}

/// An optional request parameter, made explicit.
///
/// An absent clause never fails an operation: it widens the filter it feeds to
/// "match everything".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause<T> {
    Present(T),
    Absent,
}

impl<T> Clause<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Clause<U> {
        match self {
            Clause::Present(value) => Clause::Present(f(value)),
            Clause::Absent => Clause::Absent,
        }
    }

    /// Present only when both clauses are present.
    pub fn zip<U>(self, other: Clause<U>) -> Clause<(T, U)> {
        match (self, other) {
            (Clause::Present(left), Clause::Present(right)) => Clause::Present((left, right)),
            _ => Clause::Absent,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Clause::Present(value) => Some(value),
            Clause::Absent => None,
        }
    }
}

impl Clause<String> {
    /// Reads `key` from `params`. A missing or empty value is absent.
    pub fn from_param(params: &HashMap<String, String>, key: &str) -> Self {
        match params.get(key) {
            Some(value) if !value.is_empty() => Clause::Present(value.clone()),
            _ => Clause::Absent,
        }
    }
}

/// The operations exposed over the toy collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListAll,
    GetById,
    SearchByName,
    ListByOwner,
    ListByOwnerQuery,
    ListByCategory,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Whether the operation writes to the store.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Operation::Create | Operation::Update | Operation::Delete)
    }
}

/// A decoded inbound request.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub path: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

impl Request {
    pub fn new() -> Self {
        Request::default()
    }

    pub fn with_path(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.insert(key.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns a path parameter. Path parameters are part of the route, so a
    /// missing one is an error rather than an absent clause.
    pub fn path_param(&self, key: &str) -> ToyStoreResult<&str> {
        self.path
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ToyStoreError::MissingParameter(key.to_string()))
    }

    /// Returns a query parameter as a clause.
    pub fn query_clause(&self, key: &str) -> Clause<String> {
        Clause::from_param(&self.query, key)
    }
}
