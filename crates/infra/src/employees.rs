//! Employee records in the `users` collection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use empdesk_auth::{LookupError, Role, UserLookup, UserRecord};
use empdesk_core::DocumentId;

use crate::store::{collections, Document, DocumentStore, Filter, InsertResult, StoreError, UpdateResult};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("an employee with email {0} already exists")]
    DuplicateEmail(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Repository over the user documents.
///
/// Also the [`UserLookup`] the role resolver consults on every privileged
/// request, so lookups always hit the store and never a cache.
#[derive(Clone)]
pub struct EmployeeDirectory {
    store: Arc<dyn DocumentStore>,
}

impl EmployeeDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Document>, StoreError> {
        self.store.find(collections::USERS, &Filter::all()).await
    }

    /// Store a new profile. Privilege flags are always reset: a freshly
    /// registered employee is neither verified nor fired.
    ///
    /// Email is the lookup key for role checks, so a second profile with an
    /// email already on file is rejected. The check and the insert are not
    /// atomic; concurrent registrations of one address can still race.
    pub async fn register(&self, mut profile: Map<String, Value>) -> Result<InsertResult, DirectoryError> {
        if let Some(email) = profile.get("email") {
            let existing = self
                .store
                .find_one(collections::USERS, &Filter::all().field("email", email.clone()))
                .await?;
            if existing.is_some() {
                let shown = email.as_str().map(str::to_string).unwrap_or_else(|| email.to_string());
                return Err(DirectoryError::DuplicateEmail(shown));
            }
        }

        profile.insert("verified".into(), Value::Bool(false));
        profile.insert("fired".into(), Value::Bool(false));
        Ok(self.store.insert_one(collections::USERS, profile).await?)
    }

    pub async fn mark_verified(&self, id: DocumentId) -> Result<UpdateResult, StoreError> {
        self.set(id, "verified", Value::Bool(true)).await
    }

    pub async fn promote_to_hr(&self, id: DocumentId) -> Result<UpdateResult, StoreError> {
        self.set(id, "role", Value::String(Role::HR.as_str().to_string())).await
    }

    pub async fn fire(&self, id: DocumentId) -> Result<UpdateResult, StoreError> {
        self.set(id, "fired", Value::Bool(true)).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let doc = self
            .store
            .find_one(collections::USERS, &Filter::all().field("email", email))
            .await?;
        Ok(doc.map(|d| to_record(email, &d)))
    }

    async fn set(&self, id: DocumentId, field: &str, value: Value) -> Result<UpdateResult, StoreError> {
        let mut set = Map::new();
        set.insert(field.to_string(), value);
        self.store.update_one(collections::USERS, id, set).await
    }
}

impl core::fmt::Debug for EmployeeDirectory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EmployeeDirectory").finish_non_exhaustive()
    }
}

/// Only a literal `true` counts as set; a non-string role is no role.
fn to_record(email: &str, doc: &Document) -> UserRecord {
    let flag = |name: &str| doc.get(name) == Some(&Value::Bool(true));

    let mut record = UserRecord::new(email);
    if let Some(Value::String(role)) = doc.get("role") {
        record = record.with_role(Role::new(role.clone()));
    }
    if flag("verified") {
        record = record.verified();
    }
    if flag("fired") {
        record = record.fired();
    }
    record
}

#[async_trait]
impl UserLookup for EmployeeDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, LookupError> {
        EmployeeDirectory::find_by_email(self, email)
            .await
            .map_err(|e| LookupError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn directory() -> (Arc<InMemoryDocumentStore>, EmployeeDirectory) {
        let store = Arc::new(InMemoryDocumentStore::new());
        (store.clone(), EmployeeDirectory::new(store))
    }

    #[tokio::test]
    async fn register_cannot_self_grant_privileges() {
        let (_, dir) = directory();
        dir.register(object(json!({
            "email": "eve@example.com",
            "name": "Eve",
            "verified": true,
            "fired": true,
        })))
        .await
        .unwrap();

        let record = dir.find_by_email("eve@example.com").await.unwrap().unwrap();
        assert!(!record.verified);
        assert!(!record.fired);

        let docs = dir.list().await.unwrap();
        assert_eq!(docs[0].get("name"), Some(&json!("Eve")));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (_, dir) = directory();
        dir.register(object(json!({ "email": "a@example.com", "name": "First" })))
            .await
            .unwrap();

        let err = dir
            .register(object(json!({ "email": "a@example.com", "name": "Second" })))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateEmail(ref e) if e == "a@example.com"));
        assert_eq!(dir.list().await.unwrap().len(), 1);

        // Emails compare exactly, like the self-access check.
        dir.register(object(json!({ "email": "A@example.com" })))
            .await
            .unwrap();
        assert_eq!(dir.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn promote_then_verify_produces_a_privileged_record() {
        let (_, dir) = directory();
        let id = dir
            .register(object(json!({ "email": "hr@example.com", "role": "Employee" })))
            .await
            .unwrap()
            .inserted_id;

        assert_eq!(dir.promote_to_hr(id).await.unwrap().modified_count, 1);
        assert_eq!(dir.promote_to_hr(id).await.unwrap().modified_count, 0);
        dir.mark_verified(id).await.unwrap();

        let record = dir.find_by_email("hr@example.com").await.unwrap().unwrap();
        assert_eq!(record.role, Some(Role::HR));
        assert!(record.verified);
    }

    #[tokio::test]
    async fn fire_sets_the_flag() {
        let (_, dir) = directory();
        let id = dir
            .register(object(json!({ "email": "x@example.com" })))
            .await
            .unwrap()
            .inserted_id;

        let result = dir.fire(id).await.unwrap();
        assert_eq!((result.matched_count, result.modified_count), (1, 1));
        assert!(dir.find_by_email("x@example.com").await.unwrap().unwrap().fired);
    }

    #[tokio::test]
    async fn lookup_is_lenient_about_field_types() {
        let (store, dir) = directory();
        store
            .insert_one(
                collections::USERS,
                object(json!({ "email": "odd@example.com", "role": 7, "verified": "yes" })),
            )
            .await
            .unwrap();

        let record = UserLookup::find_by_email(&dir, "odd@example.com").await.unwrap().unwrap();
        assert_eq!(record.role, None);
        assert!(!record.verified);

        assert!(UserLookup::find_by_email(&dir, "nobody@example.com").await.unwrap().is_none());
    }
}
