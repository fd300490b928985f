//! `pressroom rules` / `pressroom audit`: The rule layer and checks against it.

use super::{read_text, CommandResult};
use pressroom_config::PressroomConfig;
use pressroom_core::{parse_press_release, TargetGroup};
use pressroom_prompt::{audit as audit_content, render_rules_for};
use std::path::Path;

pub async fn run(industry: Option<String>, target_group: Option<TargetGroup>) -> CommandResult {
    let config = PressroomConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", rules_text(industry, target_group, &config));
    Ok(())
}

/// Explicit flags first, then the configured defaults.
fn rules_text(industry: Option<String>, target_group: Option<TargetGroup>, config: &PressroomConfig) -> String {
    let industry = industry.or_else(|| config.organization.industry.clone());
    render_rules_for(industry.as_deref(), super::target_group(target_group, config))
}

pub async fn audit(file: &Path) -> CommandResult {
    let text = read_text(file)?;
    let content = parse_press_release(&text);
    let violations = audit_content(&content);

    println!("🔎 Audit of {}", file.display());
    println!("  Headline:   {}", content.headline);
    println!("  Paragraphs: {}", content.body_paragraphs.len());
    println!("  Hashtags:   {}", content.hashtags.join(" "));
    println!();

    if violations.is_empty() {
        println!("  ✅ No rule violations");
        return Ok(());
    }

    println!("  ⚠️  {} rule violation(s):", violations.len());
    for violation in &violations {
        println!("   - [{}] {}", violation.element.title(), violation.message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_defaults_apply_without_flags() {
        let mut config = PressroomConfig::default();
        config.organization.industry = Some("healthcare".into());
        config.generation.default_target_group = Some(TargetGroup::Zg3);

        let text = rules_text(None, None, &config);
        assert!(text.contains("BRANCHE: GESUNDHEIT"));
        assert!(text.contains("ZIELGRUPPE: MEDIEN/JOURNALISTEN"));
        // The config still owns its industry afterwards.
        assert_eq!(config.organization.industry.as_deref(), Some("healthcare"));
    }

    #[test]
    fn flags_override_configured_defaults() {
        let mut config = PressroomConfig::default();
        config.organization.industry = Some("healthcare".into());

        let text = rules_text(Some("finance".into()), Some(TargetGroup::Zg2), &config);
        assert!(text.contains("BRANCHE: FINANZ"));
        assert!(!text.contains("BRANCHE: GESUNDHEIT"));
        assert!(text.contains("ZIELGRUPPE: CONSUMER"));
    }
}
