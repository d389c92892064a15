//! TOML config file source

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;
use tracing::warn;

/// Default config file name inside a config directory.
pub const CONFIG_FILE_NAME: &str = "treestore.toml";

/// Add the config file at `path` to the builder.
///
/// A missing optional file is skipped with a warning; a missing required
/// file fails when the configuration is built.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !required && !path.exists() {
        warn!(
            config_path = %path.display(),
            "Configuration file not found, using defaults"
        );
        return Ok(builder);
    }
    Ok(builder.add_source(File::from(path).required(required)))
}
