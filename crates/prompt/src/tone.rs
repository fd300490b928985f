//! Tone classification of a brand-voice document.
//!
//! Keyword scan over the lower-cased document in fixed priority order:
//! formal, then casual, then modern. The first family with any keyword
//! present as a substring wins; no match is [`Tone::Undefined`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The tone families recognised in a brand-voice document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Formal,
    Casual,
    Modern,
    Undefined,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Modern => "modern",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The three sets are disjoint and no keyword is a substring of a keyword in
// a lower-priority set.
const FORMAL_KEYWORDS: &[&str] = &[
    "formal",
    "förmlich",
    "seriös",
    "sachlich",
    "konservativ",
    "offiziell",
    "distanziert",
];

const CASUAL_KEYWORDS: &[&str] = &[
    "locker",
    "casual",
    "lässig",
    "umgangssprachlich",
    "humorvoll",
    "du-form",
    "nahbar",
];

const MODERN_KEYWORDS: &[&str] = &[
    "modern",
    "innovativ",
    "zeitgemäß",
    "dynamisch",
    "zukunftsorientiert",
    "progressiv",
    "digital",
];

/// Fixed priority order of the keyword families.
const FAMILIES: [(Tone, &[&str]); 3] = [
    (Tone::Formal, FORMAL_KEYWORDS),
    (Tone::Casual, CASUAL_KEYWORDS),
    (Tone::Modern, MODERN_KEYWORDS),
];

/// Extract the tone of a brand-voice document.
pub fn classify(document: &str) -> Tone {
    let lower = document.to_lowercase();
    FAMILIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(Tone::Undefined, |(tone, _)| *tone)
}

/// Extracted tone plus an optional explicit override.
///
/// The override always wins downstream; the extraction is kept so both can
/// be shown side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneReport {
    pub extracted: Tone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_tag: Option<String>,
}

impl ToneReport {
    pub fn new(document: &str, override_tag: Option<&str>) -> Self {
        Self {
            extracted: classify(document),
            override_tag: override_tag
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_lowercase),
        }
    }

    /// The tone downstream consumers must use.
    pub fn effective(&self) -> &str {
        self.override_tag.as_deref().unwrap_or(self.extracted.as_str())
    }

    pub fn is_overridden(&self) -> bool {
        self.override_tag.is_some()
    }
}
