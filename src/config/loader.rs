// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, RunnerError};

/// Document syntax, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// `.yaml` / `.yml` are YAML; everything else is treated as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// This only performs deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| RunnerError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;

    parse_str(&contents, ConfigFormat::from_path(path))
}

/// Parse an in-memory document.
pub fn parse_str(contents: &str, format: ConfigFormat) -> Result<RawConfigFile> {
    let config = match format {
        ConfigFormat::Toml => toml::from_str(contents)?,
        ConfigFormat::Yaml => serde_yaml::from_str(contents)?,
    };
    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML or YAML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks the fields that would otherwise only fail at launch time.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let config = ConfigFile::try_from(raw_config)?;
    debug!(?path, "configuration loaded");
    Ok(config)
}
