//! Configuration System
//!
//! Layered configuration for applications embedding a store: merge-policy
//! defaults, then an optional TOML file, then `TREESTORE__*` environment
//! variables. The result is validated before use.

use crate::diagnostics::Diagnostics;
use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::store::StoreOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::file::CONFIG_FILE_NAME;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreestoreConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Durable store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backing document path
    #[serde(default = "default_document")]
    pub document: PathBuf,

    /// Indent saved documents
    #[serde(default)]
    pub pretty: bool,
}

fn default_document() -> PathBuf {
    PathBuf::from("treestore.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            document: default_document(),
            pretty: false,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.document.as_os_str().is_empty() {
            return Err("Document path cannot be empty".to_string());
        }
        if self.document.to_string_lossy().ends_with('~') {
            return Err(format!(
                "Document path {:?} collides with the temporary write path",
                self.document
            ));
        }
        Ok(())
    }

    /// Store options for this configuration.
    pub fn options(&self, diagnostics: Diagnostics) -> StoreOptions {
        StoreOptions::default()
            .with_pretty(self.pretty)
            .with_diagnostics(diagnostics)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Store(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Store(msg) => write!(f, "Store: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TreestoreConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.store.validate() {
            errors.push(ValidationError::Store(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Builds a [`TreestoreConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from `<dir>/treestore.toml` if present, plus defaults and
    /// environment overrides.
    pub fn load(dir: &Path) -> Result<TreestoreConfig, ConfigError> {
        Self::build(&dir.join(CONFIG_FILE_NAME), false)
    }

    /// Load from an explicit config file, which must exist.
    pub fn load_from_file(path: &Path) -> Result<TreestoreConfig, ConfigError> {
        Self::build(path, true)
    }

    /// Defaults and environment overrides only.
    pub fn load_defaults() -> Result<TreestoreConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::env::add_to_builder(builder)?;
        Self::finish(builder.build()?)
    }

    fn build(path: &Path, required: bool) -> Result<TreestoreConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::file::add_to_builder(builder, path, required)?;
        let builder = sources::env::add_to_builder(builder)?;
        Self::finish(builder.build()?)
    }

    fn finish(settings: ::config::Config) -> Result<TreestoreConfig, ConfigError> {
        let config: TreestoreConfig = settings.try_deserialize()?;
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ConfigError::Invalid(messages.join("\n"))
        })?;
        Ok(config)
    }
}
