//! Persistence for Pressroom: [`ProjectStore`](pressroom_core::ProjectStore)
//! backends and the two services built on them.

mod codec;
pub mod documents;
pub mod facts;
pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use documents::DocumentService;
pub use facts::{FactRecordWithHash, FactService};
pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
