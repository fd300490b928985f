//! The fact record: the minimal structured fact set a press release is
//! generated from.
//!
//! One record per project. All six leaf fields are free text. Partial
//! updates go through [`FactRecordPatch`] and merge at the leaf level, so
//! changing `hook.event` never touches `hook.location`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hash;

/// Separator between the three blocks of the AI export.
pub const EXPORT_BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// The news hook: what happens, where and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    pub event: String,
    pub location: String,
    pub date: String,
}

/// What is new compared to the status quo, and the proof for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    pub delta: String,
    pub evidence: String,
}

/// A roster reference plus the unpolished statement the speaker wants conveyed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuote {
    pub speaker_id: String,
    pub raw_statement: String,
}

/// The structured fact record of one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    pub hook: Hook,
    pub details: Details,
    pub quote: RawQuote,
}

impl FactRecord {
    /// Canonical content hash over exactly the six leaf fields.
    pub fn content_hash(&self) -> String {
        // A struct of plain strings always serializes.
        hash::canonical_json_hash(self).unwrap_or_else(|_| hash::sha256_hex(b""))
    }

    /// Render the record as the fixed three-block text consumed by the
    /// prompt builders.
    pub fn export_for_ai(&self) -> String {
        let hook = format!(
            "HOOK (W-FRAGEN)\nEreignis: {}\nOrt: {}\nDatum: {}",
            self.hook.event, self.hook.location, self.hook.date
        );
        let details = format!(
            "DETAILS (SUBSTANZ)\nDelta (Was ist neu?): {}\nEvidenz (Beweis): {}",
            self.details.delta, self.details.evidence
        );
        let quote = format!(
            "ZITAT (O-TON)\nSprecher-ID: {}\nRohaussage: {}",
            self.quote.speaker_id, self.quote.raw_statement
        );
        [hook, details, quote].join(EXPORT_BLOCK_SEPARATOR)
    }

    /// Merge a partial update into this record, leaf by leaf.
    pub fn apply(&mut self, patch: FactRecordPatch) {
        if let Some(hook) = patch.hook {
            merge(&mut self.hook.event, hook.event);
            merge(&mut self.hook.location, hook.location);
            merge(&mut self.hook.date, hook.date);
        }
        if let Some(details) = patch.details {
            merge(&mut self.details.delta, details.delta);
            merge(&mut self.details.evidence, details.evidence);
        }
        if let Some(quote) = patch.quote {
            merge(&mut self.quote.speaker_id, quote.speaker_id);
            merge(&mut self.quote.raw_statement, quote.raw_statement);
        }
    }
}

fn merge(slot: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Partial update of a fact record. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactRecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<HookPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DetailsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<RawQuotePatch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookPatch {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailsPatch {
    #[serde(default)]
    pub delta: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuotePatch {
    #[serde(default)]
    pub speaker_id: Option<String>,
    #[serde(default)]
    pub raw_statement: Option<String>,
}

/// A fact record as persisted for a project, with store-managed timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFactRecord {
    pub project_id: String,
    #[serde(flatten)]
    pub facts: FactRecord,
    /// Set on first insert only.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
