//! In-memory backend: useful for testing and ephemeral sessions.

use async_trait::async_trait;
use pressroom_core::error::StoreError;
use pressroom_core::store::{Collection, ProjectStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Key = (Collection, String);

/// A store that keeps every document in a map.
/// Nothing survives the process.
#[derive(Clone)]
pub struct InMemoryStore {
    documents: Arc<RwLock<HashMap<Key, Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored documents across all collections.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn get(&self, collection: Collection, project_id: &str) -> Result<Option<Value>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents.get(&(collection, project_id.to_string())).cloned())
    }

    async fn put(&self, collection: Collection, project_id: &str, document: Value) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .insert((collection, project_id.to_string()), document);
        Ok(())
    }

    async fn delete(&self, collection: Collection, project_id: &str) -> Result<bool, StoreError> {
        let removed = self
            .documents
            .write()
            .await
            .remove(&(collection, project_id.to_string()));
        Ok(removed.is_some())
    }
}
