// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::command::DEFAULT_BINARY;
use crate::vars::ExtraVars;

/// Configuration as deserialized from disk, before validation.
///
/// ```toml
/// [ansible]
/// binary = "ansible-playbook"
/// default_playbook = "site.yml"
/// default_inventory = "hosts.ini"
/// working_dir = "/srv/playbooks"
///
/// [ansible.default_extra_vars]
/// env = "staging"
///
/// [logging]
/// level = "INFO"
/// file = "logs/playbook-runner.log"
/// max_bytes = 10485760
/// backup_count = 5
///
/// [runner]
/// timeout_seconds = 3600
/// enable_async = false
/// ```
///
/// The same document can be written in YAML. `[ansible]` is required;
/// the other sections fall back to defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub ansible: AnsibleSection,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub runner: RunnerSection,
}

/// Validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub ansible: AnsibleSection,
    pub logging: LoggingSection,
    pub runner: RunnerSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        ansible: AnsibleSection,
        logging: LoggingSection,
        runner: RunnerSection,
    ) -> Self {
        Self {
            ansible,
            logging,
            runner,
        }
    }
}

/// `[ansible]` section: what to run and where.
#[derive(Debug, Clone, Deserialize)]
pub struct AnsibleSection {
    /// Path or bare name of the playbook executable.
    pub binary: String,

    /// Used when `--playbook` is not given.
    #[serde(default)]
    pub default_playbook: Option<String>,

    /// Used when `--inventory` is not given.
    #[serde(default)]
    pub default_inventory: Option<String>,

    /// Base mapping that `--extra-vars` is merged into.
    #[serde(default)]
    pub default_extra_vars: ExtraVars,

    /// Playbook and inventory names are resolved against this directory,
    /// and the child process runs in it.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for AnsibleSection {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            default_playbook: None,
            default_inventory: None,
            default_extra_vars: ExtraVars::new(),
            working_dir: default_working_dir(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// `DEBUG`, `INFO`, `WARNING`, `ERROR` (case-insensitive; `TRACE` and
    /// `WARN` are accepted too).
    #[serde(default = "default_level")]
    pub level: String,

    /// Size-rotated log file. Console only when absent.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Rotate once the file would grow past this many bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Number of rotated files (`<file>.1` .. `<file>.N`) to keep.
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,
}

fn default_level() -> String {
    "INFO".to_string()
}

fn default_max_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_backup_count() -> usize {
    5
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            max_bytes: default_max_bytes(),
            backup_count: default_backup_count(),
        }
    }
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    /// Deadline for the playbook process; `0` disables it.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Use the non-blocking path even without `--async`.
    #[serde(default)]
    pub enable_async: bool,
}

fn default_timeout_seconds() -> u64 {
    3600
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            enable_async: false,
        }
    }
}

impl RunnerSection {
    /// Effective deadline, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_seconds)
    }
}

/// `0` means "no deadline".
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
