//! Filter Builder: turns request parameters into filter predicates.
//!
//! A `None` predicate matches every document. Malformed input that is present
//! fails the operation; optional input that is absent widens the filter instead.

use bson::oid::ObjectId;

use crate::{
    error::{ToyStoreError, ToyStoreResult},
    query::{Expr, Filter},
    request::Clause,
    toy::{SubCategory, fields},
};

/// Parses a client-supplied identifier into the store's identifier format.
pub fn parse_id(id: &str) -> ToyStoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| ToyStoreError::InvalidIdentifier(id.to_string()))
}

/// Merge rule for optional clauses: a present clause becomes its predicate, an
/// absent one matches everything.
pub fn merge(clause: Clause<Expr>) -> Option<Expr> {
    clause.into_option()
}

pub struct FilterBuilder;

impl FilterBuilder {
    /// List-all: no predicate.
    pub fn all() -> Option<Expr> {
        None
    }

    /// Lookup-by-id. Fails with `InvalidIdentifier` before any store access.
    pub fn by_id(id: &str) -> ToyStoreResult<Expr> {
        Ok(Filter::eq(fields::ID, parse_id(id)?))
    }

    /// Search-by-name: case-insensitive containment on `toyName`. The empty
    /// string is contained in every name.
    pub fn by_name(text: &str) -> Expr {
        Filter::contains(fields::TOY_NAME, text)
    }

    /// Lookup-by-owner, path form: exact, case-sensitive email match.
    pub fn by_owner(email: &str) -> Expr {
        Filter::eq(fields::SELLER_EMAIL, email)
    }

    /// Lookup-by-owner, query form: no email means every owner.
    pub fn by_owner_query(email: Clause<String>) -> Option<Expr> {
        merge(email.map(|email| Self::by_owner(&email)))
    }

    /// Lookup-by-category: filters only when both `value` and `label` are present.
    pub fn by_category(value: Clause<String>, label: Clause<String>) -> Option<Expr> {
        merge(
            value
                .zip(label)
                .map(|(value, label)| {
                    Filter::eq(fields::SUB_CATEGORY, SubCategory::new(value, label))
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Bson, doc};
    use crate::query::FieldOp;

    #[test]
    fn by_id_rejects_malformed_identifiers() {
        let err = FilterBuilder::by_id("not-an-object-id").unwrap_err();

        assert!(matches!(err, ToyStoreError::InvalidIdentifier(id) if id == "not-an-object-id"));
    }

    #[test]
    fn by_id_matches_on_object_id() {
        let id = ObjectId::new();
        let expr = FilterBuilder::by_id(&id.to_hex()).unwrap();

        assert_eq!(expr, Filter::eq("_id", id));
    }

    #[test]
    fn by_name_keeps_the_raw_substring() {
        let expr = FilterBuilder::by_name("Red.Car");

        assert_eq!(expr.field, "toyName");
        assert_eq!(expr.op, FieldOp::Contains);
        assert_eq!(expr.value, Bson::String("Red.Car".into()));
    }

    #[test]
    fn owner_query_without_email_matches_everything() {
        assert_eq!(FilterBuilder::by_owner_query(Clause::Absent), None);
        assert_eq!(
            FilterBuilder::by_owner_query(Clause::Present("A@x.com".into())),
            Some(Filter::eq("sellerEmail", "A@x.com")),
        );
    }

    #[test]
    fn partial_category_matches_everything() {
        assert_eq!(
            FilterBuilder::by_category(Clause::Present("cars".into()), Clause::Absent),
            None,
        );
        assert_eq!(
            FilterBuilder::by_category(Clause::Absent, Clause::Present("Cars".into())),
            None,
        );
        assert_eq!(FilterBuilder::by_category(Clause::Absent, Clause::Absent), None);
    }

    #[test]
    fn full_category_matches_the_composite() {
        let expr = FilterBuilder::by_category(
            Clause::Present("cars".into()),
            Clause::Present("Cars".into()),
        );

        assert_eq!(
            expr,
            Some(Filter::eq("sub_category", doc! { "value": "cars", "label": "Cars" })),
        );
    }
}
