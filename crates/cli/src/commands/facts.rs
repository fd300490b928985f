//! `pressroom facts`: Fact record management.

use super::{read_text, CommandResult, Services};
use pressroom_core::{FactRecord, FactRecordPatch};
use std::path::Path;

pub async fn show(project: &str) -> CommandResult {
    let services = Services::load().await?;
    println!("{}", show_report(&services, project).await?);
    Ok(())
}

pub async fn save(project: &str, file: &Path) -> CommandResult {
    let services = Services::load().await?;
    let facts: FactRecord = serde_json::from_str(&read_text(file)?)
        .map_err(|e| format!("Invalid fact record {}: {e}", file.display()))?;
    let stored = services.facts.save(project, facts).await?;
    println!("✅ Saved fact record for '{project}'");
    println!("   Hash: {}", stored.facts.content_hash());
    Ok(())
}

pub async fn update(project: &str, file: &Path) -> CommandResult {
    let services = Services::load().await?;
    let patch: FactRecordPatch = serde_json::from_str(&read_text(file)?)
        .map_err(|e| format!("Invalid fact patch {}: {e}", file.display()))?;
    let stored = services.facts.update(project, patch).await?;
    println!("✅ Updated fact record for '{project}'");
    println!("   Hash: {}", stored.facts.content_hash());
    Ok(())
}

pub async fn delete(project: &str) -> CommandResult {
    let services = Services::load().await?;
    if services.facts.delete(project).await? {
        println!("🗑️  Deleted fact record for '{project}'");
    } else {
        println!("  (no fact record for '{project}')");
    }
    Ok(())
}

pub async fn export(project: &str) -> CommandResult {
    let services = Services::load().await?;
    let text = services.facts.export_for_ai(project).await;
    if text.is_empty() {
        return Err(format!("No fact record for project '{project}'").into());
    }
    println!("{text}");
    Ok(())
}

pub async fn hash(project: &str) -> CommandResult {
    let services = Services::load().await?;
    let hash = services
        .facts
        .hash(project)
        .await
        .ok_or_else(|| format!("No fact record for project '{project}'"))?;
    println!("{hash}");
    Ok(())
}

async fn show_report(services: &Services, project: &str) -> Result<String, Box<dyn std::error::Error>> {
    match services.facts.get_with_hash(project).await {
        Some(with_hash) => Ok(serde_json::to_string_pretty(&with_hash)?),
        None => Ok(format!("  (no fact record for '{project}')")),
    }
}
