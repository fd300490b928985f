//! Pressroom CLI: the main entry point.
//!
//! Commands:
//! - `init`: Write a default config file
//! - `status`: Show configuration and store status
//! - `compose`: Build the layered instruction document
//! - `brief`: Build the fact-resolved generation brief for a project
//! - `tone`: Classify the tone of a brand document
//! - `rules`: Print the rule layer
//! - `audit`: Check a press release against the rule layer
//! - `facts`: Manage a project's fact record
//! - `doc`: Manage a project's generated document

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pressroom_core::TargetGroup;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "pressroom",
    about = "Pressroom — press-release prompt composition and document store",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file to ~/.pressroom/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show configuration and store status
    Status,

    /// Compose the brand, rule and project-context layers
    Compose {
        /// Brand voice document (markdown)
        #[arg(short, long)]
        brand: Option<PathBuf>,

        /// Industry tag for the rule layer (defaults to organization.industry)
        #[arg(short, long)]
        industry: Option<String>,

        /// Explicit tone, overriding the one extracted from the brand document
        #[arg(short, long)]
        tone: Option<String>,

        /// Target group: ZG1/B2B, ZG2/CONSUMER, ZG3/MEDIA
        #[arg(short = 'g', long)]
        target_group: Option<TargetGroup>,

        #[arg(long)]
        occasion: Option<String>,

        #[arg(long)]
        goal: Option<String>,

        #[arg(long)]
        key_message: Option<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the generation brief from a project's stored fact record
    Brief {
        #[arg(short, long)]
        project: String,

        /// Brand voice document (markdown)
        #[arg(short, long)]
        brand: Option<PathBuf>,

        /// Speaker roster (JSON array of {id, name, position})
        #[arg(short, long)]
        roster: Option<PathBuf>,

        /// Organization name (defaults to organization.name)
        #[arg(short, long)]
        organization: Option<String>,

        #[arg(short = 'g', long)]
        target_group: Option<TargetGroup>,

        /// Date for the lead line, YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        json: bool,
    },

    /// Classify the tone of a brand document
    Tone {
        /// Brand voice document (markdown)
        file: PathBuf,

        /// Explicit tone that takes precedence over the extracted one
        #[arg(long = "override")]
        override_tag: Option<String>,
    },

    /// Print the rule layer
    Rules {
        #[arg(short, long)]
        industry: Option<String>,

        #[arg(short = 'g', long)]
        target_group: Option<TargetGroup>,
    },

    /// Check a generated press release against the rule layer
    Audit {
        /// Generator output (plain text)
        file: PathBuf,
    },

    /// Manage a project's fact record
    Facts {
        #[command(subcommand)]
        action: FactsAction,
    },

    /// Manage a project's generated document
    Doc {
        #[command(subcommand)]
        action: DocAction,
    },
}

#[derive(Subcommand)]
enum FactsAction {
    /// Show the stored record and its hash
    Show {
        #[arg(short, long)]
        project: String,
    },
    /// Save a full record from a JSON file
    Save {
        #[arg(short, long)]
        project: String,
        file: PathBuf,
    },
    /// Merge a partial JSON record into the stored one
    Update {
        #[arg(short, long)]
        project: String,
        file: PathBuf,
    },
    /// Delete the record
    Delete {
        #[arg(short, long)]
        project: String,
    },
    /// Print the AI export
    Export {
        #[arg(short, long)]
        project: String,
    },
    /// Print the content hash
    Hash {
        #[arg(short, long)]
        project: String,
    },
}

#[derive(Subcommand)]
enum DocAction {
    /// Show the current document
    Show {
        #[arg(short, long)]
        project: String,
    },
    /// Parse generator output and save it as the current version
    Ingest {
        #[arg(short, long)]
        project: String,
        /// Generator output (plain text)
        file: PathBuf,
        /// Brand voice document the text was generated from
        #[arg(short, long)]
        brand: Option<PathBuf>,
        #[arg(short = 'g', long)]
        target_group: Option<TargetGroup>,
    },
    /// Print the plain-text export
    Export {
        #[arg(short, long)]
        project: String,
    },
    /// List superseded versions, newest first
    History {
        #[arg(short, long)]
        project: String,
    },
    /// Make a history entry the current version again
    Restore {
        #[arg(short, long)]
        project: String,
        index: usize,
    },
    /// Check whether the brand document or the facts changed since generation
    Outdated {
        #[arg(short, long)]
        project: String,
        #[arg(short, long)]
        brand: Option<PathBuf>,
    },
    /// Delete the document and its history
    Delete {
        #[arg(short, long)]
        project: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { force } => commands::init::run(force).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Compose {
            brand,
            industry,
            tone,
            target_group,
            occasion,
            goal,
            key_message,
            json,
        } => {
            commands::compose::run(commands::compose::ComposeArgs {
                brand,
                industry,
                tone,
                target_group,
                occasion,
                goal,
                key_message,
                json,
            })
            .await?
        }
        Commands::Brief {
            project,
            brand,
            roster,
            organization,
            target_group,
            date,
            json,
        } => {
            commands::brief::run(commands::brief::BriefArgs {
                project,
                brand,
                roster,
                organization,
                target_group,
                date,
                json,
            })
            .await?
        }
        Commands::Tone { file, override_tag } => commands::tone::run(&file, override_tag.as_deref()).await?,
        Commands::Rules { industry, target_group } => commands::rules::run(industry, target_group).await?,
        Commands::Audit { file } => commands::rules::audit(&file).await?,
        Commands::Facts { action } => match action {
            FactsAction::Show { project } => commands::facts::show(&project).await?,
            FactsAction::Save { project, file } => commands::facts::save(&project, &file).await?,
            FactsAction::Update { project, file } => commands::facts::update(&project, &file).await?,
            FactsAction::Delete { project } => commands::facts::delete(&project).await?,
            FactsAction::Export { project } => commands::facts::export(&project).await?,
            FactsAction::Hash { project } => commands::facts::hash(&project).await?,
        },
        Commands::Doc { action } => match action {
            DocAction::Show { project } => commands::doc::show(&project).await?,
            DocAction::Ingest {
                project,
                file,
                brand,
                target_group,
            } => commands::doc::ingest(&project, &file, brand.as_deref(), target_group).await?,
            DocAction::Export { project } => commands::doc::export(&project).await?,
            DocAction::History { project } => commands::doc::history(&project).await?,
            DocAction::Restore { project, index } => commands::doc::restore(&project, index).await?,
            DocAction::Outdated { project, brand } => commands::doc::outdated(&project, brand.as_deref()).await?,
            DocAction::Delete { project } => commands::doc::delete(&project).await?,
        },
    }

    Ok(())
}
