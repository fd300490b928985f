//! `pressroom status`: Show configuration and store status.

use super::CommandResult;
use pressroom_config::PressroomConfig;

pub async fn run() -> CommandResult {
    let config = PressroomConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("📰 Pressroom Status");
    println!("===================");
    println!("  Config dir:    {}", PressroomConfig::config_dir().display());
    println!("  Store:         {}", config.store.backend);
    if config.store.backend == "sqlite" {
        let db_path = std::path::Path::new(&config.store.path);
        if db_path.exists() {
            let size_kb = std::fs::metadata(db_path)?.len() as f64 / 1024.0;
            println!("  DB file:       {} ({:.1} KB)", db_path.display(), size_kb);
        } else {
            println!("  DB file:       {} (not created yet)", db_path.display());
        }
    }
    let organization = if config.organization.name.is_empty() {
        "(unset)"
    } else {
        config.organization.name.as_str()
    };
    println!("  Organization:  {organization}");
    println!(
        "  Industry:      {}",
        config.organization.industry.as_deref().unwrap_or("(none)")
    );
    println!("  Fallback seat: {}", config.organization.fallback_location);
    println!(
        "  Target group:  {}",
        config
            .generation
            .default_target_group
            .map_or_else(|| "(none)".to_string(), |g| format!("{} ({})", g.code(), g.label()))
    );

    if PressroomConfig::config_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `pressroom init` first");
    }

    Ok(())
}
