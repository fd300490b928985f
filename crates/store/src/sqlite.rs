//! SQLite backend.
//!
//! One table, `documents`, keyed by `(collection, project_id)`. Each row
//! holds the whole JSON document; a write is a single upsert, so readers
//! never observe a half-written document.

use async_trait::async_trait;
use chrono::Utc;
use pressroom_core::error::StoreError;
use pressroom_core::store::{Collection, ProjectStore};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// A SQLite document store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and run migrations.
    ///
    /// Pass `"sqlite::memory:"` for an ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Unavailable(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // Every connection to ":memory:" opens its own database.
        let max_connections = if path.contains(":memory:") { 1 } else { 4 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection  TEXT NOT NULL,
                project_id  TEXT NOT NULL,
                body        TEXT NOT NULL,
                updated_at  TEXT NOT NULL,
                PRIMARY KEY (collection, project_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("documents table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_updated_at ON documents(updated_at DESC)")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(format!("updated_at index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get(&self, collection: Collection, project_id: &str) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND project_id = ?")
            .bind(collection.as_str())
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT failed: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let body: String = row
            .try_get("body")
            .map_err(|e| StoreError::QueryFailed(format!("body column: {e}")))?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                collection: collection.to_string(),
                project_id: project_id.to_string(),
                reason: e.to_string(),
            })
    }

    async fn put(&self, collection: Collection, project_id: &str, document: Value) -> Result<(), StoreError> {
        let body = serde_json::to_string(&document)
            .map_err(|e| StoreError::WriteFailed(format!("encode document: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, project_id, body, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(collection, project_id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(collection.as_str())
        .bind(project_id)
        .bind(&body)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::WriteFailed(format!("INSERT failed: {e}")))?;

        debug!(collection = %collection, project_id = %project_id, "Stored document");
        Ok(())
    }

    async fn delete(&self, collection: Collection, project_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND project_id = ?")
            .bind(collection.as_str())
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("DELETE failed: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}
