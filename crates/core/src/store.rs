//! Store trait: the document database the services persist into.
//!
//! Records are JSON documents addressed by a collection and a project id.
//! A `put` replaces the whole document and is the unit of atomicity: a
//! reader sees either the previous document or the new one, never a mix.
//! Backends give no optimistic-concurrency guarantee across a `get` / `put`
//! pair; two writers racing on one project can lose an update.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::StoreError;

/// The collections this system persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// One [`StoredFactRecord`](crate::fact::StoredFactRecord) per project.
    FactRecords,
    /// One [`GeneratedDocument`](crate::document::GeneratedDocument) per project.
    GeneratedDocuments,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FactRecords => "fact_records",
            Self::GeneratedDocuments => "generated_documents",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The core ProjectStore trait.
///
/// Implementations: SQLite, in-memory (for testing and ephemeral sessions).
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Fetch the document of a project, if any.
    async fn get(&self, collection: Collection, project_id: &str) -> Result<Option<Value>, StoreError>;

    /// Insert or replace the document of a project.
    async fn put(&self, collection: Collection, project_id: &str, document: Value) -> Result<(), StoreError>;

    /// Delete the document of a project. Returns whether one existed.
    async fn delete(&self, collection: Collection, project_id: &str) -> Result<bool, StoreError>;
}
