//! BotTurn configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main BotTurn configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language-generation resources
    pub lg: LgConfig,

    /// Conversation-state storage
    pub storage: StorageConfig,

    /// Dialog wiring
    pub dialog: DialogConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages;
    /// the template build performs the deeper resource checks.
    pub fn validate(&self) -> Result<()> {
        if !self.lg.root.exists() {
            return Err(eyre::eyre!(
                "Template root not found: {}. Set lg.root to your root resource file.",
                self.lg.root.display()
            ));
        }
        if !self.lg.locales.iter().any(|locale| locale.is_empty()) {
            tracing::warn!("No root (\"\") locale configured; unconfigured locales will fail instead of falling back");
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .botturn.yml
        let local_config = PathBuf::from(".botturn.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/botturn/botturn.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("botturn").join("botturn.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Language-generation resources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LgConfig {
    /// Root resource file; imports resolve relative to it
    pub root: PathBuf,

    /// Locales to compile sets for ("" is the root set)
    pub locales: Vec<String>,
}

impl Default for LgConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("resources/root.lg"),
            locales: vec![String::new(), "en-us".to_string(), "fr-fr".to_string()],
        }
    }
}

/// Conversation-state storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend
    pub backend: StorageBackend,

    /// Database file for the sqlite backend; defaults under the user's
    /// data directory
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: None,
        }
    }
}

impl StorageConfig {
    /// Database path for the sqlite backend
    pub fn database_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("botturn")
                .join("state.db")
        })
    }
}

/// Available storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local, lost on exit
    Memory,
    /// Durable single-file SQLite database
    #[default]
    Sqlite,
}

/// Dialog wiring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Dialog started on a conversation's first turn
    #[serde(rename = "root-dialog")]
    pub root_dialog: String,

    /// Per-turn deadline in seconds; 0 disables the deadline
    #[serde(rename = "turn-timeout-secs")]
    pub turn_timeout_secs: u64,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            root_dialog: "main".to_string(),
            turn_timeout_secs: 30,
        }
    }
}
