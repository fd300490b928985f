//! # Pressroom Core
//!
//! Domain types, traits, and error definitions for the Pressroom
//! press-release pipeline. This crate has **no framework dependencies**:
//! it defines the domain model that the prompt builders and the store
//! services implement against.
//!
//! ## Design Philosophy
//!
//! Persistence is defined as a trait here ([`ProjectStore`]); backends live
//! in `pressroom-store`. Everything else in this crate is plain data plus
//! pure functions over it:
//! - the fact record and its AI export and content hash
//! - the generated document, its text/HTML export and bounded history
//! - the reader that turns generator text back into structured content

pub mod error;
pub mod audience;
pub mod speaker;
pub mod fact;
pub mod document;
pub mod hash;
pub mod parse;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result, StoreError, DocumentError};
pub use audience::TargetGroup;
pub use speaker::SpeakerRosterEntry;
pub use fact::{FactRecord, FactRecordPatch, StoredFactRecord};
pub use document::{
    GeneratedDocument, GeneratedDocumentContent, GeneratedDocumentPatch, HistoryEntry,
    NewGeneratedDocument, Quote, HISTORY_CAPACITY,
};
pub use parse::{parse_export, parse_press_release};
pub use store::{Collection, ProjectStore};
