//! Error types for the Pressroom domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Pressroom operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Document errors ---
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures reported by a [`ProjectStore`](crate::store::ProjectStore) backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Corrupt record in {collection}/{project_id}: {reason}")]
    Corrupt {
        collection: String,
        project_id: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    #[error("No {kind} stored for project {project_id}")]
    NotFound { kind: String, project_id: String },

    #[error("History index {index} out of range (history holds {len} entries)")]
    HistoryIndexOutOfRange { index: usize, len: usize },
}
