//! `pressroom brief`: Build the generation brief for a project.

use super::{read_brand, read_text, CommandResult, Services};
use chrono::NaiveDate;
use pressroom_core::{SpeakerRosterEntry, TargetGroup};
use pressroom_prompt::{FactResolver, GenerationBrief, ResolverInput};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct BriefArgs {
    pub project: String,
    pub brand: Option<PathBuf>,
    pub roster: Option<PathBuf>,
    pub organization: Option<String>,
    pub target_group: Option<TargetGroup>,
    pub date: Option<NaiveDate>,
    pub json: bool,
}

pub async fn run(args: BriefArgs) -> CommandResult {
    let services = Services::load().await?;
    let brief = build(&services, &args).await?;

    info!(
        project = %args.project,
        speaker = %brief.speaker.name,
        location = %brief.location.name,
        "Built generation brief"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&brief)?);
    } else {
        println!("{}", brief.text);
    }
    Ok(())
}

async fn build(services: &Services, args: &BriefArgs) -> Result<GenerationBrief, Box<dyn std::error::Error>> {
    let record = services
        .facts
        .get(&args.project)
        .await
        .ok_or_else(|| format!("No fact record for project '{}'", args.project))?;

    let brand = read_brand(args.brand.as_deref())?;
    let roster = match args.roster.as_deref() {
        Some(path) => load_roster(path)?,
        None => Vec::new(),
    };
    let organization = args
        .organization
        .as_deref()
        .unwrap_or(services.config.organization.name.as_str());

    let resolver = FactResolver::new(services.config.organization.fallback_location.clone());
    Ok(resolver.resolve(&ResolverInput {
        brand_document: &brand,
        facts: &record.facts,
        roster: &roster,
        target_group: super::target_group(args.target_group, &services.config),
        organization,
        as_of: args.date,
    }))
}

fn load_roster(path: &Path) -> Result<Vec<SpeakerRosterEntry>, Box<dyn std::error::Error>> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid roster {}: {e}", path.display()).into())
}
