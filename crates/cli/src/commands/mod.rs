pub mod brief;
pub mod compose;
pub mod doc;
pub mod facts;
pub mod init;
pub mod rules;
pub mod status;
pub mod tone;

use pressroom_config::PressroomConfig;
use pressroom_core::{ProjectStore, TargetGroup};
use pressroom_store::{DocumentService, FactService, InMemoryStore};
use std::path::Path;
use std::sync::Arc;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Loaded config plus the two services over the configured store.
pub struct Services {
    pub config: PressroomConfig,
    pub facts: FactService,
    pub docs: DocumentService,
}

impl Services {
    pub async fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config = PressroomConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
        Self::from_config(config).await
    }

    pub async fn from_config(config: PressroomConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = open_store(&config).await?;
        Ok(Self {
            config,
            facts: FactService::new(store.clone()),
            docs: DocumentService::new(store),
        })
    }
}

/// Open the backend named in `store.backend`. The SQLite parent directory
/// is created on demand.
pub async fn open_store(config: &PressroomConfig) -> Result<Arc<dyn ProjectStore>, Box<dyn std::error::Error>> {
    match config.store.backend.as_str() {
        "memory" => {
            tracing::debug!("Using in-memory store; nothing is persisted");
            Ok(Arc::new(InMemoryStore::new()))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = Path::new(&config.store.path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
            }
            let store = pressroom_store::SqliteStore::new(&config.store.path)
                .await
                .map_err(|e| format!("Failed to open store at {}: {e}", config.store.path))?;
            Ok(Arc::new(store))
        }
        other => Err(format!("Unsupported store backend '{other}'").into()),
    }
}

pub fn read_text(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()).into())
}

/// The brand document, or an empty one when no file was given.
pub fn read_brand(path: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    path.map_or_else(|| Ok(String::new()), read_text)
}

/// Explicit flag first, then `generation.default_target_group`.
pub fn target_group(explicit: Option<TargetGroup>, config: &PressroomConfig) -> Option<TargetGroup> {
    explicit.or(config.generation.default_target_group)
}
