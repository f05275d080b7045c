//! Query translation from toyshelf queries to MongoDB syntax.

use bson::{Document, Bson, doc};
use mongodb::options::FindOptions;

use toyshelf_core::{
    query::{QueryVisitor, Query, Expr, FieldOp},
    error::{ToyStoreError, ToyStoreResult},
};


/// Translates filter predicates into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// The filter document; no predicate becomes `{}`.
    pub(crate) fn filter(expr: Option<&Expr>) -> ToyStoreResult<Document> {
        match expr {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }

    /// Sort and limit as find options.
    pub(crate) fn options(query: &Query) -> ToyStoreResult<FindOptions> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(i64::try_from(limit).map_err(|_| {
                ToyStoreError::Backend(format!("limit {limit} is out of range"))
            })?);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(doc! { sort.field.clone(): sort.direction.as_i32() });
        }

        Ok(options)
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = ToyStoreError;

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                // Escaped so the search key is matched literally
                FieldOp::Contains => match value {
                    Bson::String(s) => doc! { "$regex": regex::escape(s), "$options": "i" },
                    _ => return Err(ToyStoreError::Backend("Contains operator requires a string value".to_string())),
                },
            }
        })
    }
}
