// src/logging/mod.rs

//! Logging setup for `playbook-runner` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `PLAYBOOK_RUNNER_LOG` environment variable (e.g. "info", "debug")
//! 3. `[logging].level` from the config file
//!
//! Output goes to STDERR and, when `[logging].file` is set, to a
//! size-rotated file. Nothing is installed globally: `lib::run` builds a
//! [`LogRegistry`], turns it into a `Dispatch`, and scopes the run to it.

pub mod format;
pub mod registry;
pub mod rotating;

pub use format::LineFormat;
pub use registry::{FileSinkSpec, Handler, LogRegistry, Logger, LoggerSpec};
pub use rotating::{RotatingFile, RotatingFileWriter};

use tracing::Level;

use crate::cli::LogLevel;
use crate::config::LoggingSection;
use crate::errors::Result;

/// Logger name for everything this crate emits (its tracing target prefix).
pub const ROOT_LOGGER: &str = "playbook_runner";

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV_VAR: &str = "PLAYBOOK_RUNNER_LOG";

/// Build the registry for a normal run from the `[logging]` section.
pub fn registry_from_config(
    section: &LoggingSection,
    cli_level: Option<LogLevel>,
) -> Result<LogRegistry> {
    let level = effective_level(cli_level, Some(&section.level));

    let mut spec = LoggerSpec::console(level);
    if let Some(path) = &section.file {
        spec = spec.with_file(FileSinkSpec {
            path: path.clone(),
            max_bytes: section.max_bytes,
            backup_count: section.backup_count,
        });
    }

    let mut registry = LogRegistry::new();
    registry.get_logger(ROOT_LOGGER, &spec)?;
    Ok(registry)
}

/// Console-only registry used before (or instead of) a valid config.
pub fn bootstrap_registry(cli_level: Option<LogLevel>) -> LogRegistry {
    let mut registry = LogRegistry::new();
    let spec = LoggerSpec::console(effective_level(cli_level, None));
    // Console-only loggers never touch the filesystem.
    let _ = registry.get_logger(ROOT_LOGGER, &spec);
    registry
}

/// Resolve the level: CLI flag, then env var, then config, then INFO.
pub fn effective_level(cli_level: Option<LogLevel>, configured: Option<&str>) -> Level {
    if let Some(lvl) = cli_level {
        return level_from_log_level(lvl);
    }
    std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|s| parse_level_str(&s))
        .or_else(|| configured.and_then(parse_level_str))
        .unwrap_or(Level::INFO)
}

fn level_from_log_level(lvl: LogLevel) -> Level {
    match lvl {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

/// Parse a level name as written in config files or the environment.
pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "critical" | "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
