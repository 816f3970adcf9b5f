// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load a TOML or YAML config file from disk (`loader.rs`).
//! - Validate it into a `ConfigFile` (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{ConfigFormat, load_and_validate, load_from_path, parse_str};
pub use model::{
    AnsibleSection, ConfigFile, LoggingSection, RawConfigFile, RunnerSection, timeout_from_secs,
};
