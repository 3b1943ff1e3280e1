use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use super::{Document, DocumentStore, StoreError};

/// Postgres-backed store. All documents live in one table keyed by
/// (collection, id); resource attributes are a JSONB column so partial
/// updates are a single atomic `fields || changes` merge.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connection_timeout: u64,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(connection_timeout))
            .connect(url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection  TEXT        NOT NULL,
                id          UUID        NOT NULL,
                owner       UUID        NOT NULL,
                created_at  TIMESTAMPTZ NOT NULL,
                updated_at  TIMESTAMPTZ NOT NULL,
                fields      JSONB       NOT NULL DEFAULT '{}'::jsonb,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn row_to_document(row: &PgRow) -> Result<Document, StoreError> {
        let fields: Value = row.try_get("fields")?;
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(Document {
            id: row.try_get("id")?,
            owner: row.try_get("owner")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            fields,
        })
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, owner, created_at, updated_at, fields
             FROM documents WHERE collection = $1
             ORDER BY created_at",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_document).collect()
    }

    async fn find(&self, collection: &str, id: Uuid) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            "SELECT id, owner, created_at, updated_at, fields
             FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn insert(
        &self,
        collection: &str,
        owner: Uuid,
        fields: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let row = sqlx::query(
            "INSERT INTO documents (collection, id, owner, created_at, updated_at, fields)
             VALUES ($1, gen_random_uuid(), $2, now(), now(), $3)
             RETURNING id, owner, created_at, updated_at, fields",
        )
        .bind(collection)
        .bind(owner)
        .bind(Value::Object(fields))
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_document(&row)
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE documents
             SET fields = fields || $3, updated_at = now()
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(changes))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
