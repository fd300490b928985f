//! Reader for press-release text.
//!
//! Turns the free text returned by the text generator (or the plain-text
//! export of a stored document) back into [`GeneratedDocumentContent`].
//!
//! Two readers, tried in order:
//! - [`parse_export`] accepts only the exact block layout written by
//!   [`GeneratedDocumentContent::export_as_text`] and reads it by position.
//!   Body paragraphs are taken verbatim, so it is the inverse of the export
//!   for headline, body paragraphs and hashtags.
//! - The lenient reader handles anything else the generator returns:
//!   missing parts fall back to placeholders instead of failing.

use regex_lite::Regex;
use std::sync::LazyLock;

use crate::document::{GeneratedDocumentContent, Quote};

pub const DEFAULT_HEADLINE: &str = "Pressemitteilung";
pub const DEFAULT_LEAD: &str = "Lead-Absatz fehlt";
pub const DEFAULT_CTA: &str = "Für weitere Informationen kontaktieren Sie uns unter info@example.com";
pub const DEFAULT_HASHTAGS: [&str; 2] = ["#Pressemitteilung", "#News"];

// Patterns are compiled once; a pattern that failed to compile simply never matches.
static ATTRIBUTED_QUOTE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"^["„]([^"“]+)["“][,\s]*sagt\s+([^,]+?)(?:,\s*(.+?))?(?:\s+bei\s+(.+?))?\.?$"#).ok()
});

static SPEAKER_FIRST_QUOTE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"([A-ZÄÖÜ][a-zäöüß]+)\s+([A-ZÄÖÜ][a-zäöüß]+(?:\s+[A-ZÄÖÜ][a-zäöüß]+)?)\s+sagt:\s*["„]([^"“]+)["“]"#).ok()
});

static CTA_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\[\[CTA:\s*(.+?)\]\]").ok());

static HASHTAG_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\[\[HASHTAGS?:?\s*([^\]]*)\]\]").ok());

static LOOSE_HASHTAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"#[A-Za-zÄÖÜäöüß0-9_]+").ok());

fn captures<'t>(pattern: &LazyLock<Option<Regex>>, text: &'t str) -> Option<regex_lite::Captures<'t>> {
    LazyLock::force(pattern).as_ref()?.captures(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Searching,
    Lead,
    Body,
    Cta,
}

const BLOCK_SEPARATOR: &str = "\n\n";
const CTA_OPEN: &str = "[[CTA: ";
const HASHTAGS_OPEN: &str = "[[HASHTAGS: ";
const MARKER_CLOSE: &str = "]]";

/// Parse press-release text into structured content. Never fails.
pub fn parse_press_release(text: &str) -> GeneratedDocumentContent {
    parse_export(text).unwrap_or_else(|| parse_lenient(text))
}

/// Read the exact plain-text export layout:
///
/// ```text
/// headline
///
/// **lead**
///
/// body paragraph (zero or more, each followed by a blank line)
///
/// "quote", sagt Person, Rolle bei Firma.
///
/// [[CTA: …]]
///
/// [[HASHTAGS: #a #b]]
/// ```
///
/// Returns `None` as soon as one fixed position does not match.
pub fn parse_export(text: &str) -> Option<GeneratedDocumentContent> {
    let blocks: Vec<&str> = text.trim_end_matches(['\n', '\r']).split(BLOCK_SEPARATOR).collect();
    let [headline, lead, body @ .., quote, cta, hashtags] = blocks.as_slice() else {
        return None;
    };

    // A bold headline is generator output, not an export.
    if headline.trim().is_empty() || headline.starts_with("**") {
        return None;
    }
    let lead = lead.strip_prefix("**")?.strip_suffix("**")?;
    let quote = parse_attribution(quote)?;
    let cta = cta.strip_prefix(CTA_OPEN)?.strip_suffix(MARKER_CLOSE)?;
    let hashtags = hashtags.strip_prefix(HASHTAGS_OPEN)?.strip_suffix(MARKER_CLOSE)?;
    let hashtags: Vec<String> = hashtags.split_whitespace().map(str::to_string).collect();
    if hashtags.iter().any(|tag| !tag.starts_with('#')) {
        return None;
    }

    Some(GeneratedDocumentContent {
        headline: headline.to_string(),
        lead_paragraph: lead.to_string(),
        body_paragraphs: body.iter().map(|p| p.to_string()).collect(),
        quote,
        cta: cta.to_string(),
        hashtags,
        html_content: None,
    })
}

/// Inverse of [`Quote::attribution_line`].
fn parse_attribution(line: &str) -> Option<Quote> {
    let inner = line.strip_prefix('"')?.strip_suffix('.')?;
    let (text, attribution) = inner.rsplit_once("\", sagt ")?;
    let (speaker, company) = attribution.rsplit_once(" bei ").unwrap_or((attribution, ""));
    let (person, role) = speaker.split_once(", ").unwrap_or((speaker, ""));
    if person.trim().is_empty() {
        return None;
    }
    Some(Quote {
        text: text.to_string(),
        person: person.to_string(),
        role: role.to_string(),
        company: company.to_string(),
    })
}

fn parse_lenient(text: &str) -> GeneratedDocumentContent {
    let mut headline = String::new();
    let mut lead = String::new();
    let mut body: Vec<String> = Vec::new();
    let mut quote = Quote::default();
    let mut cta = String::new();
    let mut hashtags: Option<Vec<String>> = None;
    let mut section = Section::Searching;

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        i += 1;
        if line.is_empty() {
            continue;
        }

        if section == Section::Searching {
            headline = strip_bold(line).to_string();
            section = Section::Lead;
            continue;
        }

        if section == Section::Lead {
            section = Section::Body;
            if let Some(inner) = bold_inner(line) {
                lead = inner.to_string();
                continue;
            }
            let len = line.chars().count();
            if !is_marker(line) && !is_quote_line(line) && len > 100 && len < 400 {
                lead = line.to_string();
                continue;
            }
        }

        if let Some(caps) = captures(&HASHTAG_MARKER, line) {
            let raw = caps.get(1).map_or("", |m| m.as_str());
            hashtags = Some(raw.split_whitespace().map(normalize_tag).collect());
            continue;
        }

        if let Some(caps) = captures(&CTA_MARKER, line) {
            cta = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            continue;
        }

        if is_quote_line(line) {
            if let Some(parsed) = parse_quote_line(line) {
                quote = parsed;
            } else if let Some(text) = quoted_text(line) {
                quote.text = text;
                // "— Person, Rolle, Firma" on the following line
                if let Some(next) = lines.get(i) {
                    if let Some(rest) = next.strip_prefix(['-', '–', '—']) {
                        let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
                        quote.person = parts.first().copied().unwrap_or("Sprecher").to_string();
                        quote.role = parts.get(1).copied().unwrap_or("Geschäftsführer").to_string();
                        quote.company = parts.get(2).copied().unwrap_or_default().to_string();
                        i += 1;
                    }
                }
            }
            section = Section::Cta;
            continue;
        }

        if let Some(rest) = ["CTA:", "Kontakt:", "Weitere Informationen:"]
            .iter()
            .find_map(|prefix| line.find(prefix).map(|pos| &line[pos + prefix.len()..]))
        {
            cta = rest.trim().to_string();
            continue;
        }

        if section == Section::Cta {
            cta = line.to_string();
            continue;
        }

        if section == Section::Body && !line.starts_with('*') {
            body.push(line.to_string());
        }
    }

    if lead.is_empty() && !body.is_empty() {
        lead = body.remove(0);
    }

    if quote.text.is_empty() {
        if let Some(pos) = body.iter().position(|p| parse_quote_line(p).is_some()) {
            if let Some(parsed) = parse_quote_line(&body.remove(pos)) {
                quote = parsed;
            }
        }
    }

    let hashtags = hashtags.unwrap_or_else(|| {
        let loose = lines.iter().find_map(|line| {
            let tags: Vec<String> = LazyLock::force(&LOOSE_HASHTAG)
                .as_ref()?
                .find_iter(line)
                .map(|m| m.as_str().to_string())
                .collect();
            (tags.len() >= 2).then(|| tags.into_iter().take(3).collect::<Vec<_>>())
        });
        loose.unwrap_or_else(|| DEFAULT_HASHTAGS.iter().map(|t| t.to_string()).collect())
    });

    if quote.text.is_empty() {
        quote = Quote {
            text: "Wir freuen uns über diese Entwicklung".into(),
            person: "Sprecher".into(),
            role: "Geschäftsführer".into(),
            company: "Unternehmen".into(),
        };
    }

    GeneratedDocumentContent {
        headline: if headline.is_empty() { DEFAULT_HEADLINE.into() } else { headline },
        lead_paragraph: if lead.is_empty() { DEFAULT_LEAD.into() } else { lead },
        body_paragraphs: body,
        quote,
        cta: if cta.is_empty() { DEFAULT_CTA.into() } else { cta },
        hashtags,
        html_content: None,
    }
}

fn strip_bold(line: &str) -> &str {
    let line = line.strip_prefix("**").unwrap_or(line);
    line.strip_suffix("**").unwrap_or(line)
}

fn bold_inner(line: &str) -> Option<&str> {
    line.strip_prefix("**")?.strip_suffix("**")
}

fn is_marker(line: &str) -> bool {
    line.starts_with("[[")
}

fn is_quote_line(line: &str) -> bool {
    line.starts_with('"') || line.starts_with('„') || line.contains("sagt:") || line.contains("sagt \"")
}

fn quoted_text(line: &str) -> Option<String> {
    let start = line.find(['"', '„'])?;
    let rest = &line[start..];
    let open = rest.chars().next()?;
    let after = &rest[open.len_utf8()..];
    let end = after.find(['"', '“'])?;
    Some(after[..end].to_string())
}

fn parse_quote_line(line: &str) -> Option<Quote> {
    if let Some(caps) = captures(&ATTRIBUTED_QUOTE, line) {
        let group = |n: usize| caps.get(n).map_or("", |m| m.as_str()).trim().to_string();
        return Some(Quote {
            text: group(1),
            person: group(2),
            role: group(3),
            company: group(4),
        });
    }
    captures(&SPEAKER_FIRST_QUOTE, line).map(|caps| {
        let group = |n: usize| caps.get(n).map_or("", |m| m.as_str()).trim().to_string();
        Quote {
            text: group(3),
            person: group(2),
            role: group(1),
            company: String::new(),
        }
    })
}

fn normalize_tag(tag: &str) -> String {
    if tag.starts_with('#') {
        tag.to_string()
    } else {
        format!("#{tag}")
    }
}
