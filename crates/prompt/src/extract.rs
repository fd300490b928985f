//! Pattern extraction over the free-text brand document.
//!
//! Every signal (home location, tonality override, blacklist, key messages)
//! comes from its own pure function returning an optional result. Cascades
//! are composed with [`first_success`], so each step stays testable on its
//! own and the fallback order is visible in one place.
//!
//! All of this is heuristic pattern matching over prose. A miss degrades to
//! `None` or an empty list, never to an error.

use pressroom_core::TargetGroup;
use regex_lite::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Run `steps` left to right and return the first `Some`.
pub fn first_success<I: ?Sized, T>(input: &I, steps: &[fn(&I) -> Option<T>]) -> Option<T> {
    steps.iter().find_map(|step| step(input))
}

// ── Location ──────────────────────────────────────────────────────────────

/// Which step of the location cascade produced the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    RegisteredSeat,
    AddressLine,
    PostalCode,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocation {
    pub name: String,
    pub source: LocationSource,
}

static SEAT_LABEL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[\s\-*•]*(?:\*\*)?(?:sitz|firmensitz|hauptsitz|unternehmenssitz|registered seat|headquarters)(?:\*\*)?\s*:\s*(?:\*\*)?\s*(.+?)\s*$",
    )
    .ok()
});

static ADDRESS_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^[\s\-*•]*(\d{5})\s+([A-ZÄÖÜ][A-Za-zÄÖÜäöüß\-]+)").ok());

static POSTAL_CODE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])(\d{5})\s+([A-ZÄÖÜ][A-Za-zÄÖÜäöüß\-]+)").ok());

fn capture<'t>(re: &LazyLock<Option<Regex>>, text: &'t str, group: usize) -> Option<&'t str> {
    LazyLock::force(re).as_ref()?.captures(text)?.get(group).map(|m| m.as_str())
}

/// Step 1: an explicit "Sitz: …" / "Headquarters: …" label.
pub fn registered_seat(doc: &str) -> Option<ResolvedLocation> {
    let raw = capture(&SEAT_LABEL, doc, 1)?;
    let value = raw.trim_matches(|c: char| c == '*' || c.is_whitespace());
    // "Musterstraße 1, 80331 München" -> the postal segment names the city
    let name = value
        .split(',')
        .find_map(|segment| capture(&ADDRESS_LINE, segment.trim(), 2))
        .or_else(|| value.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())?;
    Some(ResolvedLocation {
        name: name.to_string(),
        source: LocationSource::RegisteredSeat,
    })
}

/// Step 2: a line that starts with a five-digit postal code and a city.
pub fn address_line(doc: &str) -> Option<ResolvedLocation> {
    capture(&ADDRESS_LINE, doc, 2).map(|city| ResolvedLocation {
        name: city.to_string(),
        source: LocationSource::AddressLine,
    })
}

/// Step 3: a five-digit code followed by a capitalized word anywhere.
pub fn postal_code(doc: &str) -> Option<ResolvedLocation> {
    capture(&POSTAL_CODE, doc, 2).map(|city| ResolvedLocation {
        name: city.to_string(),
        source: LocationSource::PostalCode,
    })
}

const LOCATION_CASCADE: [fn(&str) -> Option<ResolvedLocation>; 3] =
    [registered_seat, address_line, postal_code];

/// The organization's home location, or `fallback` if no pattern matches.
pub fn resolve_location(doc: &str, fallback: &str) -> ResolvedLocation {
    first_success(doc, &LOCATION_CASCADE).unwrap_or_else(|| ResolvedLocation {
        name: fallback.to_string(),
        source: LocationSource::Fallback,
    })
}

// ── Block helpers ─────────────────────────────────────────────────────────

/// A section heading: `**…**`, `**…:**`, or a markdown `#` heading.
fn is_heading(line: &str) -> bool {
    let t = line.trim();
    t.starts_with('#') || (t.starts_with("**") && (t.ends_with("**") || t.ends_with("**:")))
}

/// List item text without its bullet or number, if `line` is one.
fn list_item(line: &str) -> Option<&str> {
    let t = line.trim();
    let rest = if let Some(rest) = t.strip_prefix(['-', '*', '•']) {
        rest
    } else {
        let digits = t.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        t[digits..].strip_prefix(['.', ')'])?
    };
    let item = rest.trim();
    (!item.is_empty()).then_some(item)
}

/// Text after the heading's label, with markdown emphasis stripped.
fn inline_value(heading: &str) -> Option<String> {
    let plain = heading.replace("**", "");
    let (_, value) = plain.split_once(':')?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// The heading line containing one of `labels` and the body lines up to the
/// next heading.
fn block<'d>(doc: &'d str, labels: &[&str]) -> Option<(&'d str, Vec<&'d str>)> {
    let mut lines = doc.lines();
    let heading = lines.by_ref().find(|line| {
        let upper = line.to_uppercase();
        labels.iter().any(|label| upper.contains(label))
    })?;
    let body = lines
        .take_while(|line| !is_heading(line))
        .filter(|line| !line.trim().is_empty())
        .collect();
    Some((heading, body))
}

// ── Tonality override ─────────────────────────────────────────────────────

const TONALITY_OVERRIDE_LABELS: &[&str] = &["TONALITÄTS-OVERRIDE", "TONALITY OVERRIDE"];

/// The explicit tonality override of the brand document, if any.
///
/// Inline text after the heading wins; otherwise the list items of the
/// block are joined with ", ".
pub fn tonality_override(doc: &str) -> Option<String> {
    let (heading, body) = block(doc, TONALITY_OVERRIDE_LABELS)?;
    if let Some(value) = inline_value(heading) {
        return Some(value);
    }
    let items: Vec<&str> = body.iter().filter_map(|line| list_item(line)).collect();
    (!items.is_empty()).then(|| items.join(", "))
}

// ── Blacklist ─────────────────────────────────────────────────────────────

const BLACKLIST_LABELS: &[&str] = &["BLACKLIST", "NO-GO", "VERBOTENE BEGRIFFE"];

/// Banned terms: list items of the blacklist block plus any comma list
/// inline with its heading. Order preserved, duplicates dropped.
pub fn blacklist(doc: &str) -> Vec<String> {
    let Some((heading, body)) = block(doc, BLACKLIST_LABELS) else {
        return Vec::new();
    };
    let inline = inline_value(heading).unwrap_or_default();
    let items = body.iter().filter_map(|line| list_item(line));

    let mut terms: Vec<String> = Vec::new();
    for term in std::iter::once(inline.as_str())
        .chain(items)
        .flat_map(|chunk| chunk.split(','))
        .map(|t| t.trim().trim_matches('"'))
        .filter(|t| !t.is_empty())
    {
        if !terms.iter().any(|known| known.eq_ignore_ascii_case(term)) {
            terms.push(term.to_string());
        }
    }
    terms
}

// ── Key messages ──────────────────────────────────────────────────────────

const KEY_MESSAGE_LABELS: &[&str] = &["KERNBOTSCHAFTEN", "KEY MESSAGES"];

/// One key message with its optional audience tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyMessage {
    pub text: String,
    /// Raw tag text after "FÜR:" / "FOR:", e.g. "ZG1 (B2B Entscheider)".
    pub audience: Option<String>,
}

impl KeyMessage {
    /// Untagged messages apply to every group; tagged ones only to groups
    /// whose code the tag mentions.
    pub fn applies_to(&self, group: TargetGroup) -> bool {
        match &self.audience {
            None => true,
            Some(tag) => tag.to_uppercase().contains(group.code()),
        }
    }
}

fn audience_tag(line: &str) -> Option<&str> {
    let t = line.trim().trim_start_matches(['→', '-', '>', ' ']).trim_start();
    let upper = t.to_uppercase();
    ["FÜR:", "FOR:"]
        .iter()
        .find(|prefix| upper.starts_with(*prefix))
        .map(|prefix| t[prefix.len()..].trim())
}

/// All key messages of the brand document in order of appearance.
///
/// A "→ FÜR: <group>" line tags every following item until the next tag
/// line.
pub fn key_messages(doc: &str) -> Vec<KeyMessage> {
    let Some((_, body)) = block(doc, KEY_MESSAGE_LABELS) else {
        return Vec::new();
    };
    let mut current: Option<String> = None;
    let mut messages = Vec::new();
    for line in body {
        if let Some(tag) = audience_tag(line) {
            current = (!tag.is_empty()).then(|| tag.to_string());
        } else if let Some(text) = list_item(line) {
            messages.push(KeyMessage {
                text: text.to_string(),
                audience: current.clone(),
            });
        }
    }
    messages
}

/// Key messages that apply to `group`; all of them when no group is given.
pub fn filter_key_messages(messages: Vec<KeyMessage>, group: Option<TargetGroup>) -> Vec<KeyMessage> {
    match group {
        None => messages,
        Some(group) => messages.into_iter().filter(|m| m.applies_to(group)).collect(),
    }
}
