//! Layer composition: the instruction document handed to the generator.
//!
//! Sections, in fixed order:
//!
//! 1. **Brand** (only with a brand document): verbatim document plus the
//!    effective tone and its template from the rule library
//! 2. **Rule** (always): the rule library rendering
//! 3. **Project-Context** (only with a context): occasion, goal, key message
//! 4. **Conflict resolution** (always): the fixed precedence appendix
//!
//! Absent sections leave no trace in the output, not even a header.

use crate::rules;
use crate::tone::ToneReport;
use pressroom_core::TargetGroup;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const BRAND_MARKER: &str = "=== BRAND LAYER ===";
pub const RULE_MARKER: &str = "=== RULE LAYER ===";
pub const PROJECT_CONTEXT_MARKER: &str = "=== PROJECT-CONTEXT LAYER ===";
pub const CONFLICT_MARKER: &str = "=== KONFLIKTLÖSUNG ===";

/// Emitted verbatim as the last section.
pub const CONFLICT_RESOLUTION: &str = "\
Bei Widersprüchen zwischen den Ebenen gilt diese Rangfolge:
1. BRAND LAYER überschreibt alles.
2. RULE LAYER ist der Standard, solange der Brand Layer nichts anderes vorgibt.
3. PROJECT-CONTEXT LAYER liefert ausschließlich Fakten, niemals Stil.

Zielqualität: 85–95% im Qualitätsscore.";

/// The project brief a press release is written for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub occasion: String,
    pub goal: String,
    pub key_message: String,
}

/// Everything the composer needs for one instruction document.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositionInput<'a> {
    pub brand_document: Option<&'a str>,
    pub project_context: Option<&'a ProjectContext>,
    pub industry: Option<&'a str>,
    pub tone_override: Option<&'a str>,
    pub target_group: Option<TargetGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Brand,
    Rule,
    ProjectContext,
    ConflictResolution,
}

/// The composed document and the layers it contains, in order.
#[derive(Debug, Clone, Serialize)]
pub struct ComposedPrompt {
    pub text: String,
    pub layers: Vec<Layer>,
    /// Present iff the brand layer was emitted.
    pub tone: Option<ToneReport>,
}

impl ComposedPrompt {
    pub fn has_layer(&self, layer: Layer) -> bool {
        self.layers.contains(&layer)
    }
}

/// Compose the instruction document. Pure and total.
pub fn compose(input: &CompositionInput<'_>) -> ComposedPrompt {
    let mut sections: Vec<String> = Vec::with_capacity(4);
    let mut layers = Vec::with_capacity(4);
    let mut tone = None;

    // A blank brand document counts as absent.
    if let Some(document) = input.brand_document.filter(|d| !d.trim().is_empty()) {
        let report = ToneReport::new(document, input.tone_override);
        sections.push(brand_section(document, &report));
        layers.push(Layer::Brand);
        tone = Some(report);
    }

    sections.push(format!(
        "{RULE_MARKER}\n{}",
        rules::render_rules_for(input.industry, input.target_group)
    ));
    layers.push(Layer::Rule);

    if let Some(context) = input.project_context {
        sections.push(project_context_section(context));
        layers.push(Layer::ProjectContext);
    }

    sections.push(format!("{CONFLICT_MARKER}\n{CONFLICT_RESOLUTION}"));
    layers.push(Layer::ConflictResolution);

    debug!(layers = ?layers, industry = ?input.industry, "Composed instruction document");

    ComposedPrompt {
        text: sections.join("\n\n"),
        layers,
        tone,
    }
}

fn brand_section(document: &str, tone: &ToneReport) -> String {
    let tone_line = if tone.is_overridden() {
        format!(
            "TONALITÄT: {} (⚡ OVERRIDE AKTIV, extrahiert: {})",
            tone.effective(),
            tone.extracted
        )
    } else {
        format!("TONALITÄT: {}", tone.effective())
    };
    let mut out = format!("{BRAND_MARKER}\nDie folgende Markenstimme hat höchste Priorität.\n{tone_line}\n\n");
    if let Some(template) = rules::library().tone(tone.effective()) {
        out.push_str(&template.render());
        out.push_str("\n\n");
    }
    out.push_str(document);
    out
}

fn project_context_section(context: &ProjectContext) -> String {
    format!(
        "{PROJECT_CONTEXT_MARKER}\nANLASS: {}\nZIEL: {}\nKERNBOTSCHAFT: {}",
        context.occasion, context.goal, context.key_message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ProjectContext {
        ProjectContext {
            occasion: "Produktlaunch AutoFlow".into(),
            goal: "Leads im Mittelstand".into(),
            key_message: "KI-Workflows ohne Code".into(),
        }
    }

    fn positions(text: &str) -> Vec<usize> {
        [BRAND_MARKER, RULE_MARKER, PROJECT_CONTEXT_MARKER, CONFLICT_MARKER]
            .iter()
            .filter_map(|m| text.find(m))
            .collect()
    }

    #[test]
    fn minimal_input_has_rule_and_conflict_only() {
        let prompt = compose(&CompositionInput::default());
        assert_eq!(prompt.layers, vec![Layer::Rule, Layer::ConflictResolution]);
        assert!(!prompt.text.contains(BRAND_MARKER));
        assert!(!prompt.text.contains(PROJECT_CONTEXT_MARKER));
        assert!(prompt.text.ends_with(CONFLICT_RESOLUTION));
        assert!(prompt.tone.is_none());
    }

    #[test]
    fn all_sections_in_fixed_order() {
        let ctx = context();
        let prompt = compose(&CompositionInput {
            brand_document: Some("Wir sind seriös und sachlich."),
            project_context: Some(&ctx),
            industry: Some("technology"),
            ..Default::default()
        });
        assert_eq!(
            prompt.layers,
            vec![Layer::Brand, Layer::Rule, Layer::ProjectContext, Layer::ConflictResolution]
        );
        let pos = positions(&prompt.text);
        assert_eq!(pos.len(), 4);
        assert!(pos.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(prompt.text.matches(RULE_MARKER).count(), 1);
        assert_eq!(prompt.text.matches(CONFLICT_MARKER).count(), 1);
        assert!(prompt.text.contains("BRANCHE: TECHNOLOGIE"));
    }

    #[test]
    fn context_without_brand_keeps_order() {
        let ctx = context();
        let prompt = compose(&CompositionInput {
            project_context: Some(&ctx),
            ..Default::default()
        });
        let rule = prompt.text.find(RULE_MARKER).unwrap();
        let project = prompt.text.find(PROJECT_CONTEXT_MARKER).unwrap();
        let conflict = prompt.text.find(CONFLICT_MARKER).unwrap();
        assert!(rule < project && project < conflict);
        assert!(prompt.text.contains("ANLASS: Produktlaunch AutoFlow"));
        assert!(prompt.text.contains("ZIEL: Leads im Mittelstand"));
        assert!(prompt.text.contains("KERNBOTSCHAFT: KI-Workflows ohne Code"));
    }

    #[test]
    fn brand_document_is_embedded_verbatim_with_tone() {
        let brand = "Locker und nahbar.\n\n**🚫 BLACKLIST:**\n- Gamechanger";
        let prompt = compose(&CompositionInput {
            brand_document: Some(brand),
            ..Default::default()
        });
        assert!(prompt.text.contains(brand));
        assert!(prompt.text.contains("TONALITÄT: casual"));
        assert!(!prompt.text.contains("OVERRIDE AKTIV"));
    }

    #[test]
    fn override_is_marked_and_wins() {
        let prompt = compose(&CompositionInput {
            brand_document: Some("Seriös."),
            tone_override: Some("modern"),
            ..Default::default()
        });
        assert!(prompt.text.contains("TONALITÄT: modern (⚡ OVERRIDE AKTIV, extrahiert: formal)"));
        assert_eq!(prompt.tone.as_ref().map(|t| t.effective()), Some("modern"));
    }

    #[test]
    fn override_swaps_tone_template() {
        let extracted = compose(&CompositionInput {
            brand_document: Some("Seriös und sachlich."),
            ..Default::default()
        });
        assert!(extracted.text.contains("TONALITÄT: FORMAL"));

        let overridden = compose(&CompositionInput {
            brand_document: Some("Seriös und sachlich."),
            tone_override: Some("Startup"),
            ..Default::default()
        });
        assert!(overridden.text.contains("TONALITÄT: STARTUP"));
        assert!(!overridden.text.contains("TONALITÄT: FORMAL"));
    }

    #[test]
    fn unknown_tone_has_no_template() {
        let prompt = compose(&CompositionInput {
            brand_document: Some("Wir schreiben über Gartenbau."),
            ..Default::default()
        });
        assert!(prompt.text.contains("TONALITÄT: undefined"));
        assert_eq!(prompt.text.matches("TONALITÄT:").count(), 1);
    }

    #[test]
    fn trailing_whitespace_of_brand_document_survives() {
        let brand = "Locker.\n\n- Keine Floskeln  \n\n";
        let prompt = compose(&CompositionInput {
            brand_document: Some(brand),
            ..Default::default()
        });
        let expected = format!("{brand}\n\n{RULE_MARKER}");
        assert!(prompt.text.contains(&expected));
    }

    #[test]
    fn blank_brand_document_is_absent() {
        let prompt = compose(&CompositionInput {
            brand_document: Some("  \n "),
            ..Default::default()
        });
        assert!(!prompt.has_layer(Layer::Brand));
    }

    #[test]
    fn conflict_section_names_priorities_and_band() {
        let text = compose(&CompositionInput::default()).text;
        let brand = text.find("1. BRAND LAYER").unwrap();
        let rule = text.find("2. RULE LAYER").unwrap();
        let project = text.find("3. PROJECT-CONTEXT LAYER").unwrap();
        assert!(brand < rule && rule < project);
        assert!(text.contains("85–95%"));
    }

    #[test]
    fn audience_reaches_rule_layer() {
        let prompt = compose(&CompositionInput {
            target_group: Some(TargetGroup::Zg2),
            ..Default::default()
        });
        assert!(prompt.text.contains("ZIELGRUPPE: CONSUMER"));
    }

    #[test]
    fn composition_is_deterministic() {
        let ctx = context();
        let input = CompositionInput {
            brand_document: Some("Modern."),
            project_context: Some(&ctx),
            ..Default::default()
        };
        assert_eq!(compose(&input).text, compose(&input).text);
    }
}
