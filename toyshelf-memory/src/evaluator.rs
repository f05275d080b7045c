//! Filter evaluation and ordering for in-memory toy documents.

use std::cmp::Ordering;
use bson::{Bson, Document, datetime::DateTime, oid::ObjectId};

use toyshelf_core::{
    query::{QueryVisitor, Expr, FieldOp},
    error::{ToyStoreError, ToyStoreResult},
};


/// Type-erased, comparable representation of BSON values.
///
/// Integers and floats are normalized to `f64`. Null and unsupported types sort
/// below everything else, the way a missing field sorts in a document store.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null, missing or unsupported value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// ObjectId value
    ObjectId(ObjectId),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Embedded document, fields kept in stored order
    Map(Vec<(&'a str, Comparable<'a>)>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<Vec<_>>()
            ),
            _ => Comparable::Null,
        }
    }
}

impl<'a> Comparable<'a> {
    /// Reads `field` from `document`; a missing field is `Null`.
    pub(crate) fn field(document: &'a Document, field: &str) -> Self {
        document
            .get(field)
            .map(Comparable::from)
            .unwrap_or(Comparable::Null)
    }

    /// Total order used for sorting. Values of different kinds compare equal,
    /// except that `Null` sorts first.
    pub(crate) fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => Ordering::Equal,
            (Comparable::Null, _) => Ordering::Less,
            (_, Comparable::Null) => Ordering::Greater,
            _ => self.partial_cmp(other).unwrap_or(Ordering::Equal),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}


pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> ToyStoreResult<bool> {
        self.visit_expr(expr)
    }

    /// Whether `document` satisfies `filter`. No filter matches everything.
    pub fn matches(document: &Document, filter: Option<&Expr>) -> bool {
        match filter {
            Some(expr) => DocumentEvaluator::new(document)
                .evaluate(expr)
                .unwrap_or(false),
            None => true,
        }
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = ToyStoreError;

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.document.get(field) else {
            return Ok(false);
        };

        match op {
            FieldOp::Eq => Ok(Comparable::from(field_value) == Comparable::from(value)),
            FieldOp::Contains => match (field_value, value) {
                (Bson::String(left), Bson::String(right)) => Ok(
                    left.to_lowercase().contains(&right.to_lowercase())
                ),
                (_, Bson::String(_)) => Ok(false),
                _ => Err(ToyStoreError::Backend(
                    "Contains operator requires a string value".to_string()
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use toyshelf_core::query::Filter;

    #[test]
    fn contains_folds_case() {
        let toy = doc! { "toyName": "Red Racing CAR" };

        assert!(DocumentEvaluator::matches(&toy, Some(&Filter::contains("toyName", "car"))));
        assert!(DocumentEvaluator::matches(&toy, Some(&Filter::contains("toyName", "RED r"))));
        assert!(DocumentEvaluator::matches(&toy, Some(&Filter::contains("toyName", ""))));
        assert!(!DocumentEvaluator::matches(&toy, Some(&Filter::contains("toyName", "blue"))));
    }

    #[test]
    fn contains_treats_the_value_as_a_literal() {
        let toy = doc! { "toyName": "Red Car" };

        assert!(!DocumentEvaluator::matches(&toy, Some(&Filter::contains("toyName", "R.d"))));
        assert!(DocumentEvaluator::matches(&doc! { "toyName": "R.d" }, Some(&Filter::contains("toyName", "r.D"))));
    }

    #[test]
    fn missing_field_never_matches() {
        let toy = doc! { "sellerEmail": "a@x.com" };

        assert!(!DocumentEvaluator::matches(&toy, Some(&Filter::contains("toyName", ""))));
    }

    #[test]
    fn eq_is_case_sensitive_and_numeric_agnostic() {
        let toy = doc! { "sellerEmail": "a@x.com", "price": 10_i32 };

        assert!(DocumentEvaluator::matches(&toy, Some(&Filter::eq("sellerEmail", "a@x.com"))));
        assert!(!DocumentEvaluator::matches(&toy, Some(&Filter::eq("sellerEmail", "A@x.com"))));
        assert!(DocumentEvaluator::matches(&toy, Some(&Filter::eq("price", 10.0))));
    }

    #[test]
    fn eq_matches_whole_sub_documents() {
        let toy = doc! { "sub_category": { "value": "cars", "label": "Cars" } };

        assert!(DocumentEvaluator::matches(
            &toy,
            Some(&Filter::eq("sub_category", doc! { "value": "cars", "label": "Cars" })),
        ));
        assert!(!DocumentEvaluator::matches(
            &toy,
            Some(&Filter::eq("sub_category", doc! { "value": "cars" })),
        ));
    }

    #[test]
    fn sub_document_key_order_matters() {
        let toy = doc! { "sub_category": { "label": "Cars", "value": "cars" } };

        assert!(!DocumentEvaluator::matches(
            &toy,
            Some(&Filter::eq("sub_category", doc! { "value": "cars", "label": "Cars" })),
        ));
    }

    #[test]
    fn null_sorts_first() {
        let empty = doc! {};
        let priced = doc! { "price": 1 };

        assert_eq!(
            Comparable::field(&empty, "price").sort_cmp(&Comparable::field(&priced, "price")),
            Ordering::Less,
        );
    }
}
