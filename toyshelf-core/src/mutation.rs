//! Mutation Validator: shapes create and update payloads.
//!
//! Create has no allow-list: the payload is stored as sent, except that the store
//! assigns `_id` and the server stamps `createdAt`. Update writes exactly the four
//! mutable fields and clears any of them the payload leaves out.

use bson::{Bson, DateTime, Document, ser::serialize_to_bson};
use chrono::{DateTime as ChronoDateTime, Utc};
use serde_json::Value;

use crate::{
    backend::InsertAck,
    error::{ToyStoreError, ToyStoreResult},
    toy::fields,
};

/// Fields an update may touch. Anything else in an update payload is dropped.
pub const UPDATABLE_FIELDS: [&str; 4] = [
    fields::PRICE,
    fields::QUANTITY,
    fields::DESCRIPTION,
    fields::IMAGE,
];

pub struct MutationValidator;

impl MutationValidator {
    /// Builds the document to insert. Any client `createdAt` is overwritten with
    /// `now`. A client `_id` is deliberately discarded so the store always
    /// assigns the identifier; every other field passes through as sent.
    pub fn prepare_insert(payload: &Value, now: ChronoDateTime<Utc>) -> ToyStoreResult<Document> {
        let mut document = Self::to_document(payload)?;

        document.remove(fields::ID);
        document.insert(fields::CREATED_AT, DateTime::from_chrono(now));

        Ok(document)
    }

    /// Accepts the insert only if the store assigned an identifier.
    pub fn confirm_insert(ack: InsertAck) -> ToyStoreResult<InsertAck> {
        match &ack.inserted_id {
            Some(id) if *id != Bson::Null => Ok(ack),
            _ => Err(ToyStoreError::InsertRejected),
        }
    }

    /// Builds the `$set` document for an update. Missing fields, and a missing
    /// body, write `null`.
    pub fn prepare_update(payload: Option<&Value>) -> ToyStoreResult<Document> {
        let object = match payload {
            None | Some(Value::Null) => None,
            Some(Value::Object(object)) => Some(object),
            Some(other) => return Err(Self::not_an_object(other)),
        };

        let mut set = Document::new();

        for field in UPDATABLE_FIELDS {
            let value = match object.and_then(|object| object.get(field)) {
                Some(value) => serialize_to_bson(value)?,
                None => Bson::Null,
            };

            set.insert(field, value);
        }

        Ok(set)
    }

    fn to_document(payload: &Value) -> ToyStoreResult<Document> {
        match serialize_to_bson(payload)? {
            Bson::Document(document) => Ok(document),
            _ => Err(Self::not_an_object(payload)),
        }
    }

    fn not_an_object(payload: &Value) -> ToyStoreError {
        let kind = match payload {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };

        ToyStoreError::InvalidDocument(format!("expected a JSON object, got {kind}"))
    }
}
