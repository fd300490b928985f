//! `pressroom tone`: Classify the tone of a brand document.

use super::{read_text, CommandResult};
use pressroom_prompt::ToneReport;
use std::path::Path;

pub async fn run(file: &Path, override_tag: Option<&str>) -> CommandResult {
    let document = read_text(file)?;
    let report = ToneReport::new(&document, override_tag);

    println!("🎨 Tone of {}", file.display());
    println!("  Extracted:  {}", report.extracted.as_str());
    if report.is_overridden() {
        println!("  Override:   {} (⚡ takes precedence)", report.effective());
    }
    println!("  Effective:  {}", report.effective());

    Ok(())
}
