//! Fact resolution: the concrete generation brief for one project.
//!
//! Combines the fact record with the brand document: the speaker is looked
//! up in the roster, the organization's home location is pulled out of the
//! brand text, and tonality, blacklist and key messages become the style
//! block. Every lookup has a fallback, so resolution always yields a brief.

use crate::extract::{self, first_success, KeyMessage, ResolvedLocation};
use crate::tone::{self, Tone};
use chrono::{Datelike, Local, NaiveDate};
use pressroom_core::{FactRecord, SpeakerRosterEntry, TargetGroup};
use serde::Serialize;
use tracing::debug;

/// Location used when the brand document names none.
pub const DEFAULT_FALLBACK_LOCATION: &str = "Deutschland";

pub const PLACEHOLDER_SPEAKER_NAME: &str = "Sprecher";
pub const PLACEHOLDER_SPEAKER_POSITION: &str = "Geschäftsführung";

const CONTACT_PREFIX: &str = "contact_";

pub const ANTI_FABRICATION: &str = "\
Verwende ausschließlich die unten gelieferten Fakten. Erfinde nichts: \
keine Zahlen, keine Namen, keine Orte, keine Daten, keine zusätzlichen Zitate. \
Fehlt eine Information, lass sie weg.";

pub const NARRATIVE_ORDER: [&str; 6] = [
    "Mit dem Delta einsteigen: Was ist neu gegenüber dem Status quo?",
    "Einordnung durch den benannten Experten",
    "Konkreten Nutzen für die Zielgruppe benennen",
    "Logistik: Verfügbarkeit, Zeitpunkt, Ort",
    "Zitat",
    "Abschließendes Markenstatement",
];

const GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// "15. März 2024"
pub fn german_date(date: NaiveDate) -> String {
    let month = GERMAN_MONTHS[date.month0() as usize];
    format!("{}. {} {}", date.day(), month, date.year())
}

// ── Speaker ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerSource {
    RosterId,
    NameMatch,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSpeaker {
    pub name: String,
    pub position: String,
    pub source: SpeakerSource,
}

impl ResolvedSpeaker {
    fn from_entry(entry: &SpeakerRosterEntry, source: SpeakerSource) -> Self {
        Self {
            name: entry.name.clone(),
            position: entry.position.clone(),
            source,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_SPEAKER_NAME.to_string(),
            position: PLACEHOLDER_SPEAKER_POSITION.to_string(),
            source: SpeakerSource::Placeholder,
        }
    }
}

/// A speaker id and the roster it should be found in.
#[derive(Debug, Clone, Copy)]
pub struct SpeakerQuery<'a> {
    pub speaker_id: &'a str,
    pub roster: &'a [SpeakerRosterEntry],
}

/// Step 1: exact id match.
pub fn by_roster_id(query: &SpeakerQuery<'_>) -> Option<ResolvedSpeaker> {
    let id = query.speaker_id.trim();
    query
        .roster
        .iter()
        .find(|entry| entry.id == id)
        .map(|entry| ResolvedSpeaker::from_entry(entry, SpeakerSource::RosterId))
}

/// Step 2: `contact_<name>..._<position>`; every name part must occur in the
/// roster name, case-insensitively.
pub fn by_contact_name(query: &SpeakerQuery<'_>) -> Option<ResolvedSpeaker> {
    let rest = query.speaker_id.trim().strip_prefix(CONTACT_PREFIX)?;
    let (name, _position) = rest.rsplit_once('_')?;
    let parts: Vec<String> = name
        .split('_')
        .filter(|p| !p.is_empty())
        .map(str::to_lowercase)
        .collect();
    if parts.is_empty() {
        return None;
    }
    query
        .roster
        .iter()
        .find(|entry| {
            let candidate = entry.name.to_lowercase();
            parts.iter().all(|part| candidate.contains(part.as_str()))
        })
        .map(|entry| ResolvedSpeaker::from_entry(entry, SpeakerSource::NameMatch))
}

/// Run the speaker cascade; falls back to the placeholder speaker.
pub fn resolve_speaker<'a>(query: &SpeakerQuery<'a>) -> ResolvedSpeaker {
    let steps: [fn(&SpeakerQuery<'a>) -> Option<ResolvedSpeaker>; 2] = [by_roster_id as _, by_contact_name as _];
    first_success(query, &steps).unwrap_or_else(ResolvedSpeaker::placeholder)
}

// ── Brief ─────────────────────────────────────────────────────────────────

/// Inputs of one resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolverInput<'a> {
    pub brand_document: &'a str,
    pub facts: &'a FactRecord,
    pub roster: &'a [SpeakerRosterEntry],
    pub target_group: Option<TargetGroup>,
    pub organization: &'a str,
    /// Defaults to today's local date.
    pub as_of: Option<NaiveDate>,
}

/// The generation brief plus the values resolved along the way.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationBrief {
    pub text: String,
    pub speaker: ResolvedSpeaker,
    pub location: ResolvedLocation,
    pub tone: Tone,
    pub tonality_override: Option<String>,
    pub blacklist: Vec<String>,
    pub key_messages: Vec<KeyMessage>,
    pub as_of: NaiveDate,
}

/// Builds generation briefs. Holds only the location fallback.
#[derive(Debug, Clone)]
pub struct FactResolver {
    fallback_location: String,
}

impl Default for FactResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_LOCATION)
    }
}

impl FactResolver {
    pub fn new(fallback_location: impl Into<String>) -> Self {
        let fallback_location = fallback_location.into();
        let fallback_location = if fallback_location.trim().is_empty() {
            DEFAULT_FALLBACK_LOCATION.to_string()
        } else {
            fallback_location
        };
        Self { fallback_location }
    }

    pub fn fallback_location(&self) -> &str {
        &self.fallback_location
    }

    /// Resolve everything and render the brief. Never fails.
    pub fn resolve(&self, input: &ResolverInput<'_>) -> GenerationBrief {
        let facts = input.facts;
        let speaker = resolve_speaker(&SpeakerQuery {
            speaker_id: &facts.quote.speaker_id,
            roster: input.roster,
        });
        let location = extract::resolve_location(input.brand_document, &self.fallback_location);
        let tone = tone::classify(input.brand_document);
        let tonality_override = extract::tonality_override(input.brand_document);
        let blacklist = extract::blacklist(input.brand_document);
        let key_messages =
            extract::filter_key_messages(extract::key_messages(input.brand_document), input.target_group);
        let as_of = input.as_of.unwrap_or_else(|| Local::now().date_naive());

        debug!(
            speaker_source = ?speaker.source,
            location_source = ?location.source,
            key_messages = key_messages.len(),
            "Resolved generation brief"
        );

        let mut brief = GenerationBrief {
            text: String::new(),
            speaker,
            location,
            tone,
            tonality_override,
            blacklist,
            key_messages,
            as_of,
        };
        brief.text = render(&brief, input);
        brief
    }
}

fn render(brief: &GenerationBrief, input: &ResolverInput<'_>) -> String {
    let facts = input.facts;
    let organization = if input.organization.trim().is_empty() {
        "das Unternehmen"
    } else {
        input.organization.trim()
    };
    let audience = input
        .target_group
        .map_or_else(|| "alle Zielgruppen".to_string(), |g| format!("{} ({})", g.label(), g.code()));

    let speaker = &brief.speaker;

    let header = [
        "=== GENERIERUNGSAUFTRAG: PRESSEMITTEILUNG ===".to_string(),
        format!("Organisation: {organization}"),
        format!("Zielgruppe: {audience}"),
    ];

    let fabrication = format!("=== STRIKTE FAKTENTREUE ===\n{ANTI_FABRICATION}");

    let mut narrative = vec!["=== ERZÄHLREIHENFOLGE ===".to_string()];
    narrative.extend(
        NARRATIVE_ORDER
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {step}", i + 1)),
    );

    let lead = [
        "=== LEAD-VORLAGE ===".to_string(),
        "Der Lead beginnt mit dem Sitz der Organisation und dem Datum, nicht mit dem Ort des Ereignisses:"
            .to_string(),
        format!(
            "**{}, {} – {organization} [Kernaussage mit dem Delta].**",
            brief.location.name,
            german_date(brief.as_of)
        ),
    ];

    let fact_block = [
        "=== FAKTEN ===".to_string(),
        format!("Ereignis-Ort: {}", facts.hook.location),
        format!("Ereignis: {}", facts.hook.event),
        format!("Ereignis-Datum: {}", facts.hook.date),
        format!("Delta: {}", facts.details.delta),
        format!("Evidenz: {}", facts.details.evidence),
    ];

    let quote = [
        "=== ZITAT ===".to_string(),
        format!("Sprecher: {}", speaker.name),
        format!("Position: {}", speaker.position),
        format!("Rohaussage: {}", facts.quote.raw_statement),
        format!(
            "Format: \"[Zitat]\", sagt {}, {} bei {organization}.",
            speaker.name, speaker.position
        ),
    ];

    let mut style = vec!["=== STIL ===".to_string()];
    style.push(match &brief.tonality_override {
        Some(value) => format!("Tonalitäts-Override: {value}"),
        None => format!("Tonalität: {}", brief.tone),
    });
    style.push(if brief.blacklist.is_empty() {
        "Verbotene Begriffe: keine".to_string()
    } else {
        format!("Verbotene Begriffe: {}", brief.blacklist.join(", "))
    });
    if brief.key_messages.is_empty() {
        style.push("Kernbotschaften: keine hinterlegt".to_string());
    } else {
        style.push("Kernbotschaften:".to_string());
        style.extend(brief.key_messages.iter().map(|m| format!("- {}", m.text)));
    }

    [
        header.join("\n"),
        fabrication,
        narrative.join("\n"),
        lead.join("\n"),
        fact_block.join("\n"),
        quote.join("\n"),
        style.join("\n"),
    ]
    .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::fact::{Details, Hook, RawQuote};

    fn facts(speaker_id: &str) -> FactRecord {
        FactRecord {
            hook: Hook {
                event: "Series A".into(),
                location: "Berlin".into(),
                date: "2025-01-10".into(),
            },
            details: Details {
                delta: "first EU-based provider".into(),
                evidence: "€5M raised".into(),
            },
            quote: RawQuote {
                speaker_id: speaker_id.into(),
                raw_statement: "We democratize analytics".into(),
            },
        }
    }

    fn roster() -> Vec<SpeakerRosterEntry> {
        vec![SpeakerRosterEntry::new("c1", "Anna Weber", "CEO")]
    }

    const BRAND: &str = "\
Sachlich und präzise.

**📋 KERNBOTSCHAFTEN:**
→ FÜR: ZG1 (B2B Entscheider)
- Weniger Aufwand für Controlling
→ FÜR: ZG2 (Consumer)
- Analytics für alle

**🚫 BLACKLIST:**
- Gamechanger

**📍 FIRMENSTAMMDATEN:**
Sitz: München";

    fn input<'a>(facts: &'a FactRecord, roster: &'a [SpeakerRosterEntry]) -> ResolverInput<'a> {
        ResolverInput {
            brand_document: BRAND,
            facts,
            roster,
            target_group: Some(TargetGroup::Zg1),
            organization: "DataCo GmbH",
            as_of: NaiveDate::from_ymd_opt(2025, 3, 15),
        }
    }

    #[test]
    fn contact_id_resolves_by_name() {
        let speaker = resolve_speaker(&SpeakerQuery {
            speaker_id: "contact_anna_weber_ceo",
            roster: &roster(),
        });
        assert_eq!(speaker.name, "Anna Weber");
        assert_eq!(speaker.position, "CEO");
        assert_eq!(speaker.source, SpeakerSource::NameMatch);
    }

    #[test]
    fn exact_id_beats_name_match() {
        let roster = vec![
            SpeakerRosterEntry::new("c1", "Anna Weber", "CEO"),
            SpeakerRosterEntry::new("contact_anna_weber_ceo", "Anna Weber-Schmidt", "Vorstand"),
        ];
        let speaker = resolve_speaker(&SpeakerQuery {
            speaker_id: "contact_anna_weber_ceo",
            roster: &roster,
        });
        assert_eq!(speaker.name, "Anna Weber-Schmidt");
        assert_eq!(speaker.source, SpeakerSource::RosterId);
    }

    #[test]
    fn unknown_speaker_becomes_placeholder() {
        for id in ["ghost", "contact_max_mustermann_cto", "contact_", ""] {
            let speaker = resolve_speaker(&SpeakerQuery {
                speaker_id: id,
                roster: &roster(),
            });
            assert_eq!(speaker.name, PLACEHOLDER_SPEAKER_NAME, "id {id:?}");
            assert!(!speaker.position.is_empty());
        }
    }

    #[test]
    fn name_match_ignores_case() {
        let speaker = resolve_speaker(&SpeakerQuery {
            speaker_id: "contact_ANNA_WEBER_ceo",
            roster: &roster(),
        });
        assert_eq!(speaker.source, SpeakerSource::NameMatch);
    }

    #[test]
    fn brief_binds_home_location_not_event_location() {
        let facts = facts("contact_anna_weber_ceo");
        let roster = roster();
        let brief = FactResolver::default().resolve(&input(&facts, &roster));
        assert!(brief.text.contains("**München, 15. März 2025 – DataCo GmbH"));
        assert!(brief.text.contains("Ereignis-Ort: Berlin"));
        assert_eq!(brief.location.name, "München");
    }

    #[test]
    fn brief_contains_all_blocks() {
        let facts = facts("contact_anna_weber_ceo");
        let roster = roster();
        let text = FactResolver::default().resolve(&input(&facts, &roster)).text;
        assert!(text.contains(ANTI_FABRICATION));
        for step in NARRATIVE_ORDER {
            assert!(text.contains(step));
        }
        assert!(text.contains("Delta: first EU-based provider"));
        assert!(text.contains("Evidenz: €5M raised"));
        assert!(text.contains("Sprecher: Anna Weber"));
        assert!(text.contains("sagt Anna Weber, CEO bei DataCo GmbH."));
        assert!(text.contains("Verbotene Begriffe: Gamechanger"));
        assert!(text.contains("Tonalität: formal"));
    }

    #[test]
    fn key_messages_are_filtered_by_group() {
        let facts = facts("c1");
        let roster = roster();
        let brief = FactResolver::default().resolve(&input(&facts, &roster));
        assert!(brief.text.contains("- Weniger Aufwand für Controlling"));
        assert!(!brief.text.contains("Analytics für alle"));
    }

    #[test]
    fn empty_brand_degrades_to_fallbacks() {
        let facts = facts("nobody");
        let brief = FactResolver::new("Österreich").resolve(&ResolverInput {
            brand_document: "",
            facts: &facts,
            roster: &[],
            target_group: None,
            organization: "",
            as_of: NaiveDate::from_ymd_opt(2024, 12, 1),
        });
        assert_eq!(brief.location.name, "Österreich");
        assert_eq!(brief.speaker.name, PLACEHOLDER_SPEAKER_NAME);
        assert_eq!(brief.tone, Tone::Undefined);
        assert!(brief.text.contains("Kernbotschaften: keine hinterlegt"));
        assert!(brief.text.contains("**Österreich, 1. Dezember 2024 – das Unternehmen"));
    }

    #[test]
    fn blank_fallback_uses_default() {
        assert_eq!(FactResolver::new(" ").fallback_location(), DEFAULT_FALLBACK_LOCATION);
    }

    #[test]
    fn german_month_names() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(german_date(date), "5. März 2024");
    }
}
