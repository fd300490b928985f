//! Target groups: the coarse audience tags key messages are filtered by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of audience tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetGroup {
    /// B2B decision makers.
    #[serde(rename = "ZG1")]
    Zg1,
    /// Consumers.
    #[serde(rename = "ZG2")]
    Zg2,
    /// Media and journalists.
    #[serde(rename = "ZG3")]
    Zg3,
}

impl TargetGroup {
    pub const ALL: [TargetGroup; 3] = [TargetGroup::Zg1, TargetGroup::Zg2, TargetGroup::Zg3];

    /// The tag code as written in brand documents ("ZG1" …).
    pub fn code(self) -> &'static str {
        match self {
            Self::Zg1 => "ZG1",
            Self::Zg2 => "ZG2",
            Self::Zg3 => "ZG3",
        }
    }

    /// Human label used in instruction documents.
    pub fn label(self) -> &'static str {
        match self {
            Self::Zg1 => "B2B-Entscheider",
            Self::Zg2 => "Consumer",
            Self::Zg3 => "Medien/Journalisten",
        }
    }

    /// Key of the matching audience overlay in the rule library.
    pub fn audience_key(self) -> &'static str {
        match self {
            Self::Zg1 => "b2b",
            Self::Zg2 => "consumer",
            Self::Zg3 => "media",
        }
    }
}

impl fmt::Display for TargetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TargetGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ZG1" | "B2B" => Ok(Self::Zg1),
            "ZG2" | "CONSUMER" => Ok(Self::Zg2),
            "ZG3" | "MEDIA" => Ok(Self::Zg3),
            other => Err(format!("unknown target group: {other}")),
        }
    }
}
