//! The toy listing document.
//!
//! Toys are stored as loose BSON documents: create passes the client payload
//! through verbatim, so the store may hold fields this crate knows nothing about.
//! [`Toy`] is a typed read view over the fields the query engine relies on.

use bson::{Bson, DateTime, Document, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::{ToyStoreError, ToyStoreResult};

/// Default collection holding toy listings.
pub const COLLECTION: &str = "allToys";

/// Document field names.
pub mod fields {
    pub const ID: &str = "_id";
    pub const TOY_NAME: &str = "toyName";
    pub const SELLER_EMAIL: &str = "sellerEmail";
    pub const PRICE: &str = "price";
    pub const QUANTITY: &str = "quantity";
    pub const DESCRIPTION: &str = "description";
    pub const IMAGE: &str = "image";
    pub const SUB_CATEGORY: &str = "sub_category";
    pub const CREATED_AT: &str = "createdAt";
}

/// Composite category used as an exact-match filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub value: String,
    pub label: String,
}

impl SubCategory {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        SubCategory { value: value.into(), label: label.into() }
    }

    /// The sub-document form matched against stored toys. Field order is `value`, `label`.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert("value", self.value.clone());
        document.insert("label", self.label.clone());
        document
    }
}

impl From<SubCategory> for Bson {
    fn from(category: SubCategory) -> Self {
        Bson::Document(category.to_document())
    }
}

/// Typed view of a stored toy.
///
/// Only `_id` is guaranteed. Create stores payloads as sent, so numbers may
/// arrive as strings from a form and the four mutable fields may be null after
/// an update that omitted them. Fields that are unknown, or that do not read
/// as their typed form, are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toy {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub toy_name: Option<String>,
    pub seller_email: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "sub_category")]
    pub sub_category: Option<SubCategory>,
    pub created_at: Option<DateTime>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Toy {
    /// Decodes a stored document. Fails only when `_id` is not an `ObjectId`.
    pub fn from_document(mut document: Document) -> ToyStoreResult<Self> {
        let id = match document.remove(fields::ID) {
            Some(Bson::ObjectId(id)) => id,
            other => {
                return Err(ToyStoreError::InvalidDocument(format!(
                    "toy `_id` is not an ObjectId: {other:?}"
                )));
            }
        };

        Ok(Toy {
            id,
            toy_name: take(&mut document, fields::TOY_NAME, read_string),
            seller_email: take(&mut document, fields::SELLER_EMAIL, read_string),
            price: take(&mut document, fields::PRICE, read_f64),
            quantity: take(&mut document, fields::QUANTITY, read_i64),
            description: take(&mut document, fields::DESCRIPTION, read_string),
            image: take(&mut document, fields::IMAGE, read_string),
            sub_category: take(&mut document, fields::SUB_CATEGORY, read_sub_category),
            created_at: take(&mut document, fields::CREATED_AT, |value| value.as_datetime().copied()),
            extra: document,
        })
    }
}

/// Removes `field` when it is null or reads as `T`. Anything else stays put.
fn take<T>(document: &mut Document, field: &str, read: impl Fn(&Bson) -> Option<T>) -> Option<T> {
    let typed = match document.get(field)? {
        Bson::Null => None,
        value => Some(read(value)?),
    };

    document.remove(field);
    typed
}

fn read_string(value: &Bson) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn read_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(value) => Some(*value),
        Bson::Int32(value) => Some(f64::from(*value)),
        Bson::Int64(value) => Some(*value as f64),
        Bson::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

fn read_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(value) => Some(i64::from(*value)),
        Bson::Int64(value) => Some(*value),
        Bson::Double(value) if value.fract() == 0.0 => Some(*value as i64),
        Bson::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

fn read_sub_category(value: &Bson) -> Option<SubCategory> {
    let document = value.as_document()?;

    Some(SubCategory::new(
        document.get_str("value").ok()?,
        document.get_str("label").ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn decodes_a_cleared_toy() {
        let id = ObjectId::new();
        let toy = Toy::from_document(doc! {
            "_id": id,
            "toyName": "Red Car",
            "sellerEmail": "a@x.com",
            "price": 5_i64,
            "quantity": Bson::Null,
            "description": Bson::Null,
            "image": Bson::Null,
            "sellerName": "Alice",
        })
        .unwrap();

        assert_eq!(toy.id, id);
        assert_eq!(toy.price, Some(5.0));
        assert_eq!(toy.quantity, None);
        assert_eq!(toy.description, None);
        assert_eq!(toy.created_at, None);
        assert_eq!(toy.extra, doc! { "sellerName": "Alice" });
    }

    #[test]
    fn decodes_form_style_values() {
        let toy = Toy::from_document(doc! {
            "_id": ObjectId::new(),
            "price": "10",
            "quantity": "2",
            "image": 7_i32,
            "sub_category": { "value": "cars", "label": "Cars" },
        })
        .unwrap();

        assert_eq!(toy.price, Some(10.0));
        assert_eq!(toy.quantity, Some(2));
        assert_eq!(toy.image, None);
        assert_eq!(toy.sub_category, Some(SubCategory::new("cars", "Cars")));
        assert_eq!(toy.extra, doc! { "image": 7_i32 });
    }

    #[test]
    fn unreadable_numbers_stay_in_extra() {
        let toy = Toy::from_document(doc! {
            "_id": ObjectId::new(),
            "price": "ten",
            "quantity": 2.5,
        })
        .unwrap();

        assert_eq!(toy.price, None);
        assert_eq!(toy.quantity, None);
        assert_eq!(toy.extra, doc! { "price": "ten", "quantity": 2.5 });
    }

    #[test]
    fn id_must_be_an_object_id() {
        let err = Toy::from_document(doc! { "_id": "abc", "toyName": "Red Car" }).unwrap_err();

        assert!(matches!(err, ToyStoreError::InvalidDocument(_)));
    }

    #[test]
    fn sub_category_document_keeps_field_order() {
        let category = SubCategory::new("sports-car", "Sports Car");
        let keys = category
            .to_document()
            .keys()
            .cloned()
            .collect::<Vec<_>>();

        assert_eq!(keys, vec!["value", "label"]);
    }
}
