//! Postgres-backed document store.
//!
//! All collections share one `documents` table keyed by `(collection, id)`
//! with the body held as JSONB:
//!
//! - filters are containment queries (`body @> $filter`)
//! - `$set` is a JSONB merge (`body || $set`) applied only when some key of
//!   the patch differs from the stored value, so `rows_affected` is the
//!   modified count

use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use async_trait::async_trait;
use serde_json::{Map, Value};

use empdesk_core::DocumentId;

use super::{Document, DocumentStore, Filter, InsertResult, StoreError, UpdateResult, ID_FIELD};

const MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url` and make sure the table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.bootstrap().await?;
        Ok(store)
    }

    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id         UUID NOT NULL,
                body       JSONB NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS documents_body_gin ON documents USING GIN (body)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<Document, StoreError> {
    let id = DocumentId::from_uuid(row.try_get::<Uuid, _>("id")?);
    match row.try_get::<Json<Value>, _>("body")?.0 {
        Value::Object(body) => Ok(Document::new(id, body)),
        _ => Err(StoreError::Malformed { id }),
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip_all, fields(collection = %collection))]
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY id
            "#,
        )
        .bind(collection)
        .bind(Json(filter.as_map()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_document).collect()
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(Json(filter.as_map()))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_document).transpose()
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn insert_one(
        &self,
        collection: &str,
        mut body: Map<String, Value>,
    ) -> Result<InsertResult, StoreError> {
        body.remove(ID_FIELD);
        let id = DocumentId::new();

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(*id.as_uuid())
            .bind(Json(&body))
            .execute(&self.pool)
            .await?;

        Ok(InsertResult { inserted_id: id })
    }

    #[instrument(skip_all, fields(collection = %collection, id = %id))]
    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        mut set: Map<String, Value>,
    ) -> Result<UpdateResult, StoreError> {
        set.remove(ID_FIELD);

        let modified = sqlx::query(
            r#"
            UPDATE documents
            SET body = body || $3
            WHERE collection = $1 AND id = $2
              AND EXISTS (
                  SELECT 1
                  FROM jsonb_each($3) AS patch(key, value)
                  WHERE documents.body -> patch.key IS DISTINCT FROM patch.value
              )
            "#,
        )
        .bind(collection)
        .bind(*id.as_uuid())
        .bind(Json(&set))
        .execute(&self.pool)
        .await?
        .rows_affected();

        if modified > 0 {
            return Ok(UpdateResult {
                matched_count: modified,
                modified_count: modified,
            });
        }

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM documents WHERE collection = $1 AND id = $2)",
        )
        .bind(collection)
        .bind(*id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(UpdateResult {
            matched_count: u64::from(exists),
            modified_count: 0,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
