//! `pressroom compose`: Build the layered instruction document.

use super::{read_brand, CommandResult};
use pressroom_config::PressroomConfig;
use pressroom_core::TargetGroup;
use pressroom_prompt::{compose, CompositionInput, ProjectContext};
use std::path::PathBuf;

pub struct ComposeArgs {
    pub brand: Option<PathBuf>,
    pub industry: Option<String>,
    pub tone: Option<String>,
    pub target_group: Option<TargetGroup>,
    pub occasion: Option<String>,
    pub goal: Option<String>,
    pub key_message: Option<String>,
    pub json: bool,
}

pub async fn run(args: ComposeArgs) -> CommandResult {
    let config = PressroomConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let brand = read_brand(args.brand.as_deref())?;
    let context = project_context(args.occasion, args.goal, args.key_message);
    let industry = args.industry.or(config.organization.industry.clone());

    let composed = compose(&CompositionInput {
        brand_document: args.brand.as_ref().map(|_| brand.as_str()),
        project_context: context.as_ref(),
        industry: industry.as_deref(),
        tone_override: args.tone.as_deref(),
        target_group: super::target_group(args.target_group, &config),
    });
    tracing::debug!(layers = ?composed.layers, "Composed instruction document");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&composed)?);
    } else {
        println!("{}", composed.text);
    }
    Ok(())
}

/// A project context exists as soon as one of its fields was given.
fn project_context(
    occasion: Option<String>,
    goal: Option<String>,
    key_message: Option<String>,
) -> Option<ProjectContext> {
    if occasion.is_none() && goal.is_none() && key_message.is_none() {
        return None;
    }
    Some(ProjectContext {
        occasion: occasion.unwrap_or_default(),
        goal: goal.unwrap_or_default(),
        key_message: key_message.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_context_flags_means_no_context_layer() {
        assert!(project_context(None, None, None).is_none());
    }

    #[test]
    fn partial_context_fills_blanks() {
        let context = project_context(Some("Produktlaunch".into()), None, None).unwrap();
        assert_eq!(context.occasion, "Produktlaunch");
        assert_eq!(context.goal, "");
        assert_eq!(context.key_message, "");
    }
}
