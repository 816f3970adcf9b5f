// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, RunnerError};
use crate::logging::parse_level_str;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = RunnerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.ansible, raw.logging, raw.runner))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_ansible(cfg)?;
    validate_logging(cfg)?;
    Ok(())
}

fn validate_ansible(cfg: &RawConfigFile) -> Result<()> {
    if cfg.ansible.binary.trim().is_empty() {
        return Err(RunnerError::Config(
            "[ansible].binary must not be empty".to_string(),
        ));
    }

    if cfg.ansible.working_dir.as_os_str().is_empty() {
        return Err(RunnerError::Config(
            "[ansible].working_dir must not be empty (use \".\" for the current directory)"
                .to_string(),
        ));
    }

    if let Some(key) = cfg.ansible.default_extra_vars.keys().find(|k| k.is_empty()) {
        return Err(RunnerError::Config(format!(
            "[ansible].default_extra_vars contains an empty key ({key:?})"
        )));
    }

    Ok(())
}

fn validate_logging(cfg: &RawConfigFile) -> Result<()> {
    if parse_level_str(&cfg.logging.level).is_none() {
        return Err(RunnerError::Config(format!(
            "[logging].level '{}' is not one of DEBUG, INFO, WARNING, ERROR",
            cfg.logging.level
        )));
    }

    if let Some(file) = &cfg.logging.file {
        if file.as_os_str().is_empty() {
            return Err(RunnerError::Config(
                "[logging].file must not be empty; omit it to log to the console only"
                    .to_string(),
            ));
        }
    }

    Ok(())
}
