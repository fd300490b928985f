//! Generated press-release documents and their bounded version history.
//!
//! A project has one current [`GeneratedDocument`]. Every save supersedes
//! the current content, which moves to the front of `history`; the history
//! never holds more than [`HISTORY_CAPACITY`] entries and existing entries
//! are never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audience::TargetGroup;

/// Number of superseded versions kept per project.
pub const HISTORY_CAPACITY: usize = 3;

/// Attributed quotation of a generated press release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub person: String,
    pub role: String,
    pub company: String,
}

impl Quote {
    /// The attribution line used in the plain-text export:
    /// `"Text", sagt Person, Rolle bei Firma.`
    pub fn attribution_line(&self) -> String {
        let mut line = format!("\"{}\", sagt {}", self.text, self.person);
        if !self.role.is_empty() {
            line.push_str(", ");
            line.push_str(&self.role);
        }
        if !self.company.is_empty() {
            line.push_str(" bei ");
            line.push_str(&self.company);
        }
        line.push('.');
        line
    }
}

/// The content fields of a generated press release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocumentContent {
    pub headline: String,
    pub lead_paragraph: String,
    #[serde(default)]
    pub body_paragraphs: Vec<String>,
    pub quote: Quote,
    pub cta: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
}

impl GeneratedDocumentContent {
    /// Render the fixed plain-text press-release layout.
    ///
    /// The `[[CTA: …]]` and `[[HASHTAGS: …]]` marker lines are read back by
    /// [`parse_press_release`](crate::parse::parse_press_release) and must
    /// stay byte-for-byte stable.
    pub fn export_as_text(&self) -> String {
        let mut blocks = Vec::with_capacity(self.body_paragraphs.len() + 5);
        blocks.push(self.headline.clone());
        blocks.push(format!("**{}**", self.lead_paragraph));
        blocks.extend(self.body_paragraphs.iter().cloned());
        blocks.push(self.quote.attribution_line());
        blocks.push(format!("[[CTA: {}]]", self.cta));
        blocks.push(format!("[[HASHTAGS: {}]]", self.hashtags.join(" ")));
        blocks.join("\n\n")
    }

    /// Render the editor HTML for this content. Text is HTML-escaped.
    pub fn render_html(&self) -> String {
        EditorHtml(self).to_string()
    }
}

/// Editor markup of a document's content.
struct EditorHtml<'a>(&'a GeneratedDocumentContent);

impl fmt::Display for EditorHtml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        write!(f, "<h1>{}</h1>\n\n", Escaped(&c.headline))?;
        write!(f, "<p><strong>{}</strong></p>\n\n", Escaped(&c.lead_paragraph))?;
        for paragraph in &c.body_paragraphs {
            write!(f, "<p>{}</p>\n\n", Escaped(paragraph))?;
        }

        write!(
            f,
            "<blockquote>\n  <p>\"{}\"</p>\n  <footer>— {}, {}",
            Escaped(&c.quote.text),
            Escaped(&c.quote.person),
            Escaped(&c.quote.role)
        )?;
        if !c.quote.company.is_empty() {
            write!(f, " bei {}", Escaped(&c.quote.company))?;
        }
        f.write_str("</footer>\n</blockquote>\n\n")?;
        write!(
            f,
            "<p><span data-type=\"cta-text\" class=\"cta-text\">{}</span></p>",
            Escaped(&c.cta)
        )?;

        for (i, tag) in c.hashtags.iter().enumerate() {
            f.write_str(if i == 0 { "\n\n<p>" } else { " " })?;
            write!(f, "<span data-type=\"hashtag\" class=\"hashtag\">{}</span>", Escaped(tag))?;
        }
        if !c.hashtags.is_empty() {
            f.write_str("</p>")?;
        }
        Ok(())
    }
}

/// Text with the five HTML-significant characters replaced by entities.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(pos) = rest.find(['&', '<', '>', '"', '\'']) {
            f.write_str(&rest[..pos])?;
            f.write_str(match rest.as_bytes()[pos] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&#39;",
            })?;
            rest = &rest[pos + 1..];
        }
        f.write_str(rest)
    }
}

/// One superseded version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub content: GeneratedDocumentContent,
    pub generated_at: DateTime<Utc>,
}

/// The current generated document of a project plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub project_id: String,
    #[serde(flatten)]
    pub content: GeneratedDocumentContent,
    pub target_group: TargetGroup,
    pub brand_voice_hash: String,
    pub fact_record_hash: String,
    pub generated_at: DateTime<Utc>,
    /// Newest first; at most [`HISTORY_CAPACITY`] entries.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Input of a save: fresh content plus the hashes it was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGeneratedDocument {
    pub content: GeneratedDocumentContent,
    pub target_group: TargetGroup,
    pub brand_voice_hash: String,
    pub fact_record_hash: String,
}

impl GeneratedDocument {
    /// Build the next current document from `previous` (if any) and `next`.
    ///
    /// The previous current content is pushed to the front of the history,
    /// which is then truncated to [`HISTORY_CAPACITY`]. Older entries are
    /// carried over untouched.
    pub fn supersede(
        project_id: &str,
        previous: Option<GeneratedDocument>,
        next: NewGeneratedDocument,
        now: DateTime<Utc>,
    ) -> GeneratedDocument {
        let history = match previous {
            Some(prev) => {
                let mut history = Vec::with_capacity(HISTORY_CAPACITY + 1);
                history.push(HistoryEntry {
                    content: prev.content,
                    generated_at: prev.generated_at,
                });
                history.extend(prev.history);
                history.truncate(HISTORY_CAPACITY);
                history
            }
            None => Vec::new(),
        };

        GeneratedDocument {
            project_id: project_id.to_string(),
            content: next.content,
            target_group: next.target_group,
            brand_voice_hash: next.brand_voice_hash,
            fact_record_hash: next.fact_record_hash,
            generated_at: now,
            history,
        }
    }

    /// True iff either stored hash differs from the supplied current hash.
    pub fn is_outdated(&self, current_brand_hash: &str, current_fact_hash: &str) -> bool {
        self.brand_voice_hash != current_brand_hash || self.fact_record_hash != current_fact_hash
    }

    /// Merge a partial update into the current content. History is untouched.
    pub fn apply(&mut self, patch: GeneratedDocumentPatch) {
        let content = &mut self.content;
        if let Some(headline) = patch.headline {
            content.headline = headline;
        }
        if let Some(lead) = patch.lead_paragraph {
            content.lead_paragraph = lead;
        }
        if let Some(body) = patch.body_paragraphs {
            content.body_paragraphs = body;
        }
        if let Some(quote) = patch.quote {
            content.quote = quote;
        }
        if let Some(cta) = patch.cta {
            content.cta = cta;
        }
        if let Some(hashtags) = patch.hashtags {
            content.hashtags = hashtags;
        }
        if let Some(html) = patch.html_content {
            content.html_content = Some(html);
        }
        if let Some(group) = patch.target_group {
            self.target_group = group;
        }
    }
}

/// Partial field update of a generated document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocumentPatch {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub lead_paragraph: Option<String>,
    #[serde(default)]
    pub body_paragraphs: Option<Vec<String>>,
    #[serde(default)]
    pub quote: Option<Quote>,
    #[serde(default)]
    pub cta: Option<String>,
    #[serde(default)]
    pub hashtags: Option<Vec<String>>,
    #[serde(default)]
    pub html_content: Option<String>,
    #[serde(default)]
    pub target_group: Option<TargetGroup>,
}
