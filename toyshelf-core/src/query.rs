//! Query construction for the toy collection.
//!
//! A [`Query`] is the backend-neutral shape of a single find round trip: an
//! optional filter predicate, an optional sort and an optional result cap. A
//! missing filter means "match every document".
//!
//! ```ignore
//! use toyshelf::query::{Query, Filter, SortDirection};
//!
//! let query = Query::builder()
//!     .filter(Filter::eq("sellerEmail", "a@x.com"))
//!     .sort("price", SortDirection::Asc)
//!     .build();
//! ```
//!
//! Backends execute the predicate by implementing [`QueryVisitor`].

use bson::Bson;

use crate::error::ToyStoreError;

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (0 to 9, earliest to latest).
    Asc,
    /// Descending order (9 to 0, latest to earliest).
    Desc,
}

impl SortDirection {
    /// The numeric form used by document stores (`1` / `-1`).
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

/// Sort specification for query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Sort { field: field.into(), direction }
    }
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    /// Exact equality. Sub-documents must match as a whole.
    Eq,
    /// The string field contains the value, compared case-insensitively.
    /// The value is a literal, never a pattern.
    Contains,
}

/// A single field predicate over toy documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub op: FieldOp,
    /// The value to compare against.
    pub value: Bson,
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr { field, op, value }
    }
}

/// Helper for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches documents where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Matches documents where the string field contains the value, ignoring case.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Expr {
        Expr::field(field.into(), FieldOp::Contains, Bson::String(value.into()))
    }
}

/// A structured query for retrieving toys. Use [`QueryBuilder`] for construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Filter predicate; `None` matches every document.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return, applied after sorting.
    pub limit: Option<usize>,
    /// Sort specification; `None` keeps the store's natural order.
    pub sort: Option<Sort>,
}

impl Query {
    /// Creates a new empty query with no filter, sort or limit.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter predicate. Passing `None` keeps the query unfiltered.
    pub fn filter(mut self, filter: impl Into<Option<Expr>>) -> Self {
        self.query.filter = filter.into();
        self
    }

    /// Sets the maximum number of documents to return. `None` leaves it unbounded.
    pub fn limit(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.query.limit = limit.into();
        self
    }

    /// Sets the sort specification for the query results.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort = Some(Sort::new(field, direction));
        self
    }

    /// Sets an already resolved sort, or clears it with `None`.
    pub fn sort_by(mut self, sort: Option<Sort>) -> Self {
        self.query.sort = sort;
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

/// Translates or evaluates a filter predicate.
pub trait QueryVisitor {
    type Output;
    type Error: Into<ToyStoreError>;

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        self.visit_field(&expr.field, &expr.op, &expr.value)
    }
}
