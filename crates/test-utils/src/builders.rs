#![allow(dead_code)]

use std::path::{Path, PathBuf};

use playbook_runner::config::{
    AnsibleSection, ConfigFile, LoggingSection, RawConfigFile, RunnerSection,
};
use serde_json::Value;

use crate::scripted::SHELL;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from `binary = "sh"` so scripted playbooks run without a real
/// Ansible install.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            config: RawConfigFile {
                ansible: AnsibleSection {
                    binary: SHELL.to_string(),
                    working_dir: working_dir.as_ref().to_path_buf(),
                    ..AnsibleSection::default()
                },
                logging: LoggingSection::default(),
                runner: RunnerSection::default(),
            },
        }
    }

    pub fn with_binary(mut self, binary: &str) -> Self {
        self.config.ansible.binary = binary.to_string();
        self
    }

    pub fn with_default_playbook(mut self, playbook: &str) -> Self {
        self.config.ansible.default_playbook = Some(playbook.to_string());
        self
    }

    pub fn with_default_inventory(mut self, inventory: &str) -> Self {
        self.config.ansible.default_inventory = Some(inventory.to_string());
        self
    }

    pub fn with_default_extra_var(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.config
            .ansible
            .default_extra_vars
            .insert(key.to_string(), value.into());
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.logging.file = Some(path.into());
        self
    }

    pub fn with_timeout_seconds(mut self, secs: u64) -> Self {
        self.config.runner.timeout_seconds = secs;
        self
    }

    pub fn with_async(mut self, enabled: bool) -> Self {
        self.config.runner.enable_async = enabled;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
