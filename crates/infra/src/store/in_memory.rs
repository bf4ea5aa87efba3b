use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use empdesk_core::DocumentId;

use super::{Document, DocumentStore, Filter, InsertResult, StoreError, UpdateResult, ID_FIELD};

/// In-memory document store for tests/dev.
///
/// Each collection keeps documents in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(&d.body)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(&d.body)).cloned()))
    }

    async fn insert_one(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<InsertResult, StoreError> {
        let id = DocumentId::new();
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.entry(collection.to_string())
            .or_default()
            .push(Document::new(id, body));
        Ok(InsertResult { inserted_id: id })
    }

    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        mut set: Map<String, Value>,
    ) -> Result<UpdateResult, StoreError> {
        set.remove(ID_FIELD);

        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let Some(doc) = map
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(UpdateResult {
                matched_count: 0,
                modified_count: 0,
            });
        };

        let changed = set.iter().any(|(k, v)| doc.body.get(k) != Some(v));
        if changed {
            doc.body.extend(set);
        }

        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(changed),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.read().map(|_| ()).map_err(|_| StoreError::Poisoned)
    }

    async fn close(&self) {}
}
