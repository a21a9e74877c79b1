use anyhow::{Context, Result};
use dirs::config_dir;
use hermes_core::Catalog;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "hermes";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HermesConfig {
    /// Port of the HTTP API
    pub port: u16,
    /// Address the HTTP API binds to
    pub bind_address: String,
    /// Database file. Defaults to the platform data directory.
    pub database_path: Option<PathBuf>,
    /// JSON file replacing the built-in tailoring catalog
    pub catalog_path: Option<PathBuf>,
    /// Bearer token required by the API when set
    pub api_key: Option<String>,
    /// Allowed CORS origins. Permissive when unset.
    pub cors_origins: Option<Vec<String>>,
}

impl Default for HermesConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: "127.0.0.1".to_string(),
            database_path: None,
            catalog_path: None,
            api_key: None,
            cors_origins: None,
        }
    }
}

impl HermesConfig {
    /// Load configuration from the user's config directory and apply
    /// environment overrides.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save the configuration to the user's config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Apply `HERMES_PORT`, `HERMES_DB`, `HERMES_API_KEY` and
    /// `HERMES_CORS_ORIGINS` (comma-separated) from `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup("HERMES_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid HERMES_PORT"),
            }
        }
        if let Some(path) = lookup("HERMES_DB") {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(key) = lookup("HERMES_API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(origins) = lookup("HERMES_CORS_ORIGINS") {
            self.cors_origins = Some(
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }
        self
    }

    /// The tailoring catalog: the configured file, or the built-in one.
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => {
                let catalog = Catalog::load(path)
                    .with_context(|| format!("Failed to load catalog {}", path.display()))?;
                tracing::info!(path = %path.display(), "Loaded tailoring catalog");
                Ok(catalog)
            }
            None => Ok(Catalog::default()),
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
