// src/exec/command.rs

//! Command builder for the playbook executable.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::errors::Result;
use crate::paths::{ensure_readable, safe_join};
use crate::vars::{self, ExtraVars};

/// Binary used when the config does not name one explicitly.
pub const DEFAULT_BINARY: &str = "ansible-playbook";

/// Everything one playbook invocation needs besides the runner settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybookRequest {
    /// Playbook file, relative to the working directory.
    pub playbook: String,
    /// Inventory file, relative to the working directory.
    pub inventory: Option<String>,
    pub extra_vars: ExtraVars,
    /// Adds `--check`.
    pub dry_run: bool,
}

impl PlaybookRequest {
    pub fn new(playbook: impl Into<String>) -> Self {
        Self {
            playbook: playbook.into(),
            ..Self::default()
        }
    }

    pub fn with_inventory(mut self, inventory: impl Into<String>) -> Self {
        self.inventory = Some(inventory.into());
        self
    }

    pub fn with_extra_vars(mut self, extra_vars: ExtraVars) -> Self {
        self.extra_vars = extra_vars;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Ordered argument vector; `argv[0]` is always the executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
}

impl CommandSpec {
    fn new(program: impl Into<String>) -> Self {
        Self {
            argv: vec![program.into()],
        }
    }

    fn push(&mut self, arg: impl Into<String>) {
        self.argv.push(arg.into());
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}

/// Build the argv for `request`.
///
/// Order: binary, playbook, `-i <inventory>`, `--extra-vars <json>`,
/// `--check`. Missing or out-of-tree playbook / inventory files are
/// reported here, before anything is launched.
pub fn build_command(
    binary: &str,
    working_dir: &Path,
    request: &PlaybookRequest,
) -> Result<CommandSpec> {
    let playbook = ensure_readable(&safe_join(working_dir, &[&request.playbook])?)?;

    let mut cmd = CommandSpec::new(binary);
    cmd.push(playbook.to_string_lossy());

    if let Some(inventory) = request.inventory.as_deref().filter(|s| !s.is_empty()) {
        let inventory = ensure_readable(&safe_join(working_dir, &[inventory])?)?;
        cmd.push("-i");
        cmd.push(inventory.to_string_lossy());
    }

    if !request.extra_vars.is_empty() {
        cmd.push("--extra-vars");
        cmd.push(vars::to_json(&request.extra_vars)?);
    }

    if request.dry_run {
        cmd.push("--check");
    }

    debug!(argc = cmd.argv.len(), "built playbook command");
    Ok(cmd)
}
