//! Speaker roster entries: the people a quotation may be attributed to.
//!
//! The roster is owned by the brand profile, not by this crate; it is
//! passed in by reference wherever a speaker needs resolving.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerRosterEntry {
    pub id: String,
    pub name: String,
    pub position: String,
}

impl SpeakerRosterEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: position.into(),
        }
    }
}
