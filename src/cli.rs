// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `playbook-runner`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "playbook-runner",
    version,
    about = "Run an Ansible playbook with a validated config, inventory and extra vars.",
    long_about = None,
    after_help = "Example: playbook-runner --config config/config.toml \
                  --playbook site.yml --inventory hosts.ini \
                  --extra-vars key1=val1 key2=val2 --dry-run"
)]
pub struct CliArgs {
    /// Path to the config file (TOML, or YAML for `.yaml` / `.yml`).
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Playbook file, relative to the working directory.
    ///
    /// Overrides `[ansible].default_playbook`.
    #[arg(long, value_name = "NAME")]
    pub playbook: Option<String>,

    /// Inventory file, relative to the working directory.
    ///
    /// Overrides `[ansible].default_inventory`.
    #[arg(long, value_name = "NAME")]
    pub inventory: Option<String>,

    /// Extra vars as space-separated `key=value` pairs, or a single JSON
    /// object. Merged over `[ansible].default_extra_vars`.
    #[arg(long = "extra-vars", value_name = "TOKEN", num_args = 0..)]
    pub extra_vars: Vec<String>,

    /// Run the playbook on the non-blocking (async) path.
    #[arg(long = "async")]
    pub use_async: bool,

    /// Run the playbook in check mode (`--check`).
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PLAYBOOK_RUNNER_LOG` or `[logging].level` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Kill the playbook after this many seconds (0 = never).
    ///
    /// Overrides `[runner].timeout_seconds`.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
