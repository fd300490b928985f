//! `pressroom doc`: Generated document management.

use super::{read_brand, read_text, CommandResult, Services};
use pressroom_core::hash::brand_voice_hash;
use pressroom_core::{GeneratedDocument, TargetGroup};
use std::path::Path;

pub async fn show(project: &str) -> CommandResult {
    let services = Services::load().await?;
    match services.docs.get(project).await {
        Some(document) => println!("{}", serde_json::to_string_pretty(&document)?),
        None => println!("  (no generated document for '{project}')"),
    }
    Ok(())
}

pub async fn ingest(
    project: &str,
    file: &Path,
    brand: Option<&Path>,
    target_group: Option<TargetGroup>,
) -> CommandResult {
    let services = Services::load().await?;
    let text = read_text(file)?;
    let brand = read_brand(brand)?;
    let target_group = super::target_group(target_group, &services.config)
        .ok_or("No target group: pass --target-group or set generation.default_target_group")?;

    let document = ingest_with(&services, project, &text, &brand, target_group).await?;

    println!("✅ Saved generated document for '{project}'");
    println!("   Headline:     {}", document.content.headline);
    println!("   Target group: {}", document.target_group);
    println!("   History:      {} earlier version(s)", document.history.len());
    Ok(())
}

pub async fn export(project: &str) -> CommandResult {
    let services = Services::load().await?;
    let text = services.docs.export_as_text(project).await;
    if text.is_empty() {
        return Err(format!("No generated document for project '{project}'").into());
    }
    println!("{text}");
    Ok(())
}

pub async fn history(project: &str) -> CommandResult {
    let services = Services::load().await?;
    let history = services.docs.history(project).await;

    println!("🕘 History of '{project}' (newest first)");
    if history.is_empty() {
        println!("  (empty)");
    }
    for (index, entry) in history.iter().enumerate() {
        println!(
            "  [{index}] {}  {}",
            entry.generated_at.format("%Y-%m-%d %H:%M:%S"),
            entry.content.headline
        );
    }
    Ok(())
}

pub async fn restore(project: &str, index: usize) -> CommandResult {
    let services = Services::load().await?;
    let document = services.docs.restore_from_history(project, index).await?;
    println!("♻️  Restored history entry {index} of '{project}'");
    println!("   Headline: {}", document.content.headline);
    Ok(())
}

pub async fn outdated(project: &str, brand: Option<&Path>) -> CommandResult {
    let services = Services::load().await?;
    let brand = read_brand(brand)?;
    if !services.docs.exists(project).await {
        println!("  (no generated document for '{project}')");
        return Ok(());
    }
    if outdated_with(&services, project, &brand).await {
        println!("⚠️  '{project}' is outdated: brand voice or facts changed since generation");
    } else {
        println!("✅ '{project}' is up to date");
    }
    Ok(())
}

pub async fn delete(project: &str) -> CommandResult {
    let services = Services::load().await?;
    if services.docs.delete(project).await? {
        println!("🗑️  Deleted generated document for '{project}'");
    } else {
        println!("  (no generated document for '{project}')");
    }
    Ok(())
}

/// Ingest with provenance taken from the brand document and the stored facts.
async fn ingest_with(
    services: &Services,
    project: &str,
    text: &str,
    brand: &str,
    target_group: TargetGroup,
) -> Result<GeneratedDocument, Box<dyn std::error::Error>> {
    let fact_hash = services
        .facts
        .hash(project)
        .await
        .ok_or_else(|| format!("No fact record for project '{project}'; save the facts first"))?;
    let document = services
        .docs
        .ingest(project, text, target_group, &brand_voice_hash(brand), &fact_hash)
        .await?;
    Ok(document)
}

/// A missing fact record counts as changed facts.
async fn outdated_with(services: &Services, project: &str, brand: &str) -> bool {
    let fact_hash = services.facts.hash(project).await.unwrap_or_default();
    services
        .docs
        .is_outdated(project, &brand_voice_hash(brand), &fact_hash)
        .await
}
