use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};

use empdesk_auth::{CredentialVerifier, Gate, Hs256Jwt, PrivilegePolicy, RoleResolver, TokenError};
use empdesk_infra::{
    collections, Document, DocumentStore, EmployeeDirectory, Filter, InMemoryDocumentStore, InsertResult,
    PostgresDocumentStore, StoreError,
};

use crate::config::Config;

/// Everything a handler needs, built once at startup and shared.
pub struct AppServices {
    pub store: Arc<dyn DocumentStore>,
    pub employees: EmployeeDirectory,
    pub tokens: Arc<Hs256Jwt>,
    pub gate: Arc<Gate>,
}

impl AppServices {
    /// Wire the token codec, the employee directory, and the gate over `store`.
    ///
    /// The gate verifies with the same secret `issue_token` signs with.
    pub fn new(store: Arc<dyn DocumentStore>, secret: &str, policy: PrivilegePolicy) -> Self {
        let tokens = Arc::new(Hs256Jwt::new(secret));
        let employees = EmployeeDirectory::new(store.clone());
        let gate = Gate::new(
            CredentialVerifier::new(tokens.clone()),
            RoleResolver::new(Arc::new(employees.clone()), policy),
        );

        Self {
            store,
            employees,
            tokens,
            gate: Arc::new(gate),
        }
    }

    pub fn in_memory(secret: &str, policy: PrivilegePolicy) -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()), secret, policy)
    }

    pub fn issue_token(&self, payload: Map<String, Value>) -> Result<String, TokenError> {
        self.tokens.issue(payload, Utc::now())
    }

    pub async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.store.find(collection, &Filter::all()).await
    }

    pub async fn work_for(&self, email: &str) -> Result<Vec<Document>, StoreError> {
        self.store
            .find(collections::WORK, &Filter::all().field("email", email))
            .await
    }

    pub async fn record_work(&self, entry: Map<String, Value>) -> Result<InsertResult, StoreError> {
        self.store.insert_one(collections::WORK, entry).await
    }
}

/// Build services from configuration: Postgres when `DATABASE_URL` is set,
/// otherwise a process-local in-memory store.
pub async fn build_services(config: &Config) -> Result<AppServices, StoreError> {
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => Arc::new(PostgresDocumentStore::connect(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory document store (data is lost on restart)");
            Arc::new(InMemoryDocumentStore::new())
        }
    };

    Ok(AppServices::new(
        store,
        &config.access_token_secret,
        config.privilege_policy(),
    ))
}
