//! Fact Store Service: one fact record per project.
//!
//! Read paths (`get`, `exists`, `export_for_ai`, `hash`, `get_with_hash`)
//! swallow store failures: they log a warning and report absence, so a
//! caller cannot tell "not found" from "store unreachable". Write paths
//! (`save`, `update`, `delete`) propagate every failure.

use crate::codec::{decode, encode};
use chrono::Utc;
use pressroom_core::error::{DocumentError, Error, Result, StoreError};
use pressroom_core::fact::{FactRecord, FactRecordPatch, StoredFactRecord};
use pressroom_core::store::{Collection, ProjectStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

const COLLECTION: Collection = Collection::FactRecords;

/// A stored record together with its current content hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactRecordWithHash {
    pub record: StoredFactRecord,
    pub hash: String,
}

#[derive(Clone)]
pub struct FactService {
    store: Arc<dyn ProjectStore>,
}

impl FactService {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    async fn load(&self, project_id: &str) -> std::result::Result<Option<StoredFactRecord>, StoreError> {
        match self.store.get(COLLECTION, project_id).await? {
            Some(value) => decode(COLLECTION, project_id, value).map(Some),
            None => Ok(None),
        }
    }

    /// The stored record, or `None` if absent or unreadable.
    pub async fn get(&self, project_id: &str) -> Option<StoredFactRecord> {
        match self.load(project_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(project_id = %project_id, error = %e, "Fact record read failed");
                None
            }
        }
    }

    pub async fn exists(&self, project_id: &str) -> bool {
        self.get(project_id).await.is_some()
    }

    /// Insert or replace the record. `created_at` is set on first insert
    /// and carried over afterwards.
    pub async fn save(&self, project_id: &str, facts: FactRecord) -> Result<StoredFactRecord> {
        let now = Utc::now();
        let created_at = self
            .load(project_id)
            .await?
            .map_or(now, |existing| existing.created_at);

        let record = StoredFactRecord {
            project_id: project_id.to_string(),
            facts,
            created_at,
            updated_at: now,
        };
        self.store
            .put(COLLECTION, project_id, encode(&record)?)
            .await?;
        debug!(project_id = %project_id, "Saved fact record");
        Ok(record)
    }

    /// Merge `patch` into the stored record leaf by leaf.
    pub async fn update(&self, project_id: &str, patch: FactRecordPatch) -> Result<StoredFactRecord> {
        let mut record = self.load(project_id).await?.ok_or_else(|| not_found(project_id))?;
        record.facts.apply(patch);
        record.updated_at = Utc::now();
        self.store
            .put(COLLECTION, project_id, encode(&record)?)
            .await?;
        debug!(project_id = %project_id, "Updated fact record");
        Ok(record)
    }

    /// Returns whether a record existed.
    pub async fn delete(&self, project_id: &str) -> Result<bool> {
        let removed = self.store.delete(COLLECTION, project_id).await?;
        debug!(project_id = %project_id, removed, "Deleted fact record");
        Ok(removed)
    }

    /// The three-block AI export, or an empty string if there is no record.
    pub async fn export_for_ai(&self, project_id: &str) -> String {
        self.get(project_id)
            .await
            .map(|record| record.facts.export_for_ai())
            .unwrap_or_default()
    }

    /// Content hash of the stored record.
    pub async fn hash(&self, project_id: &str) -> Option<String> {
        self.get(project_id).await.map(|record| record.facts.content_hash())
    }

    pub async fn get_with_hash(&self, project_id: &str) -> Option<FactRecordWithHash> {
        self.get(project_id).await.map(|record| FactRecordWithHash {
            hash: record.facts.content_hash(),
            record,
        })
    }
}

fn not_found(project_id: &str) -> Error {
    Error::Document(DocumentError::NotFound {
        kind: "fact record".into(),
        project_id: project_id.to_string(),
    })
}
