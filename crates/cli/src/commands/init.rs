//! `pressroom init`: Write a default config file.

use super::CommandResult;
use pressroom_config::PressroomConfig;

pub async fn run(force: bool) -> CommandResult {
    println!("📰 Pressroom Setup");
    println!("==================\n");

    let config_dir = PressroomConfig::config_dir();
    let config_path = PressroomConfig::config_path();

    std::fs::create_dir_all(&config_dir)?;
    println!("  ✅ Config dir: {}", config_dir.display());

    if config_path.exists() && !force {
        println!("  ⚠️  Config already exists: {}", config_path.display());
        println!("     Re-run with --force to overwrite it.\n");
        return Ok(());
    }

    std::fs::write(&config_path, PressroomConfig::default_toml())?;
    println!("  ✅ Config written: {}", config_path.display());

    println!("\n📝 Next steps:");
    println!("   1. Set organization.name and organization.industry in {}", config_path.display());
    println!("   2. Run: pressroom facts save --project <id> facts.json");
    println!("   3. Run: pressroom brief --project <id> --brand brand.md\n");

    Ok(())
}
