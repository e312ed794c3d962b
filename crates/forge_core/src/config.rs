use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable overriding the configured log filter.
pub const LOG_LEVEL_ENV: &str = "CONCEPTFORGE_LOG";

// ---------------------------------------------------------------------------
// ForgeConfig
// ---------------------------------------------------------------------------

/// Application configuration stored at `~/.conceptforge/config.json`.
///
/// The Gemini API key is **never** written to the JSON file. It is read from
/// the `GEMINI_API_KEY` environment variable by [`ForgeConfig::apply_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    #[serde(skip)]
    pub gemini_api_key: Option<String>,

    // Text generation
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub request_timeout_secs: u64,

    // Evaluation
    /// Ask the model to confirm or override the computed level.
    pub level_refinement: bool,
    /// Upper bound on the advisory refinement call.
    pub evaluation_timeout_secs: u64,

    // General
    pub log_level: String,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".into(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            request_timeout_secs: 30,
            level_refinement: true,
            evaluation_timeout_secs: 5,
            log_level: "info".into(),
        }
    }
}

impl ForgeConfig {
    /// Returns the base config directory: `~/.conceptforge/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".conceptforge"))
    }

    /// Returns the config file path: `~/.conceptforge/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.conceptforge/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Ensures all required directories exist.
    pub fn ensure_dirs() -> Result<()> {
        for dir in [Self::base_dir()?, Self::logs_dir()?] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            }
        }
        Ok(())
    }

    /// Loads config from the default location, creating it if missing, then
    /// applies environment overrides.
    pub fn load() -> Result<Self> {
        Self::ensure_dirs()?;
        let path = Self::config_path()?;
        let mut config = Self::load_from_path(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load config from a specific file path. A missing file is created with
    /// default values.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Self = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Self::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
            config.save_to_path(path)?;
            info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Save config to a specific file path (the API key is excluded via
    /// `#[serde(skip)]`).
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Pull secrets and overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(GEMINI_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.gemini_api_key = Some(key.trim().to_string());
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|l| !l.trim().is_empty()) {
            self.log_level = level.trim().to_string();
        }
    }

    /// Whether a usable Gemini key is configured.
    pub fn has_gemini_key(&self) -> bool {
        self.gemini_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn evaluation_timeout(&self) -> Duration {
        Duration::from_secs(self.evaluation_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
