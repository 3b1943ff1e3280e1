pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// A stored record: store-assigned identity and timestamps plus the
/// resource attributes as a JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("query error: {0}")]
    Query(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Document store seam. Handlers receive this as an injected
/// `Arc<dyn DocumentStore>` handle; each method covers one external call
/// and the store provides any per-document atomicity.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in a collection, oldest first.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Lookup by id. `Ok(None)` when the id is unknown.
    async fn find(&self, collection: &str, id: Uuid) -> Result<Option<Document>, StoreError>;

    /// Persist a new document. The store assigns the id and timestamps.
    async fn insert(
        &self,
        collection: &str,
        owner: Uuid,
        fields: Map<String, Value>,
    ) -> Result<Document, StoreError>;

    /// Partial-merge update: `changes` entries overwrite matching field
    /// keys, everything else is untouched, `updated_at` is bumped.
    /// Returns false when the id is unknown.
    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> Result<bool, StoreError>;

    /// Delete by id. Returns false when the id is unknown.
    async fn remove(&self, collection: &str, id: Uuid) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
