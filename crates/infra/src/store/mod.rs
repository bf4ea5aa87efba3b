//! Schemaless document storage.
//!
//! Documents are JSON objects grouped into named collections and addressed by
//! a [`DocumentId`]. Queries are conjunctions of top-level field equalities
//! and updates merge top-level fields (`$set`).

use async_trait::async_trait;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use empdesk_core::DocumentId;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;

/// Collection names.
pub mod collections {
    pub const USERS: &str = "users";
    pub const SERVICES: &str = "services";
    pub const REVIEWS: &str = "reviews";
    pub const WORK: &str = "work";
}

/// Reserved key under which a document's id is exposed.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("document {id} has a non-object body")]
    Malformed { id: DocumentId },

    #[error("document decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A stored document: its id plus the JSON body (which never contains `_id`).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub body: Map<String, Value>,
}

impl Document {
    pub fn new(id: DocumentId, mut body: Map<String, Value>) -> Self {
        body.remove(ID_FIELD);
        Self { id, body }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.body.len() + 1))?;
        map.serialize_entry(ID_FIELD, &self.id)?;
        for (k, v) in &self.body {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Field-equality filter. The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn matches(&self, body: &Map<String, Value>) -> bool {
        self.0.iter().all(|(k, v)| body.get(k) == Some(v))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertResult {
    pub inserted_id: DocumentId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    /// Documents selected by the id (0 or 1).
    pub matched_count: u64,
    /// Documents whose body actually changed.
    pub modified_count: u64,
}

/// Long-lived handle to a document database.
///
/// Constructed once at startup, shared by every request, and closed
/// explicitly on shutdown.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError>;

    async fn insert_one(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<InsertResult, StoreError>;

    /// Merge `set` into the top level of the document with `id`.
    ///
    /// Each value replaces the stored one wholesale (nested objects are not
    /// merged). The document counts as modified when any key's value differs.
    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        set: Map<String, Value>,
    ) -> Result<UpdateResult, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn document_serializes_id_alongside_body() {
        let id = DocumentId::new();
        let doc = Document::new(id, object(json!({ "_id": "spoofed", "email": "a@example.com" })));

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json, json!({ "_id": id.to_string(), "email": "a@example.com" }));
    }

    #[test]
    fn filter_is_a_conjunction_of_equalities() {
        let body = object(json!({ "email": "a@example.com", "month": "May", "hours": 8 }));

        assert!(Filter::all().matches(&body));
        assert!(Filter::all().field("email", "a@example.com").matches(&body));
        assert!(
            Filter::all()
                .field("email", "a@example.com")
                .field("hours", 8)
                .matches(&body)
        );
        assert!(!Filter::all().field("email", "b@example.com").matches(&body));
        assert!(!Filter::all().field("missing", Value::Null).matches(&body));
    }
}
