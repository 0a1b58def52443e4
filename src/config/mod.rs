use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod validator;

use crate::adapters::file_store::FileDocumentStore;
use crate::adapters::route_generator::DEFAULT_PREFIX;
use crate::adapters::state_manager::{StateManager, DEFAULT_DOCUMENT_KEY};
use crate::cli::Cli;
use crate::domain::DocumentStore;

pub const DEFAULT_CONFIG_FILE: &str = "apisim.toml";
pub const DEFAULT_STORAGE_DIR: &str = ".apisim";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Path every generated route is rooted at
    pub prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Directory holding `<key>.json` for the file backend
    pub path: PathBuf,
    pub key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                prefix: DEFAULT_PREFIX.to_string(),
            },
            storage: StorageSettings {
                backend: StorageBackend::File,
                path: PathBuf::from(DEFAULT_STORAGE_DIR),
                key: DEFAULT_DOCUMENT_KEY.to_string(),
            },
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a config file; a missing file yields defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let settings = Self::load(path.as_ref())?;
        settings.validate()?;
        Ok(settings)
    }

    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path).required(false))
            .set_default("api.prefix", DEFAULT_PREFIX)?
            .set_default("storage.backend", "file")?
            .set_default("storage.path", DEFAULT_STORAGE_DIR)?
            .set_default("storage.key", DEFAULT_DOCUMENT_KEY)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(prefix) = &cli.prefix {
            self.api.prefix = prefix.clone();
        }
        if let Some(backend) = cli.storage {
            self.storage.backend = backend;
        }
        if let Some(path) = &cli.storage_path {
            self.storage.path = path.clone();
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Write the settings as pretty TOML
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), anyhow::Error> {
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), toml_str)?;
        Ok(())
    }

    /// Document store selected by `[storage]`
    pub fn build_store(&self) -> Arc<dyn DocumentStore> {
        match self.storage.backend {
            StorageBackend::File => Arc::new(FileDocumentStore::new(
                self.storage.path.clone(),
                self.storage.key.clone(),
            )),
            StorageBackend::Memory => Arc::new(StateManager::with_key(self.storage.key.clone())),
        }
    }
}
