// src/runner.rs

//! `PlaybookRunner`: the single entry point for running a playbook.
//!
//! Callers pick an [`ExecMode`]; both modes share the command builder and
//! the exit-status mapping and differ only in how the child is driven.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tracing::debug;

use crate::errors::Result;
use crate::exec::{self, CommandSpec, PlaybookRequest};
use crate::types::ExecMode;

#[derive(Debug, Clone)]
pub struct PlaybookRunner {
    working_dir: PathBuf,
    binary: String,
    timeout: Option<Duration>,
}

impl PlaybookRunner {
    pub fn new(working_dir: impl Into<PathBuf>, binary: impl Into<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Kill the child and fail with `RunnerError::Timeout` once `timeout`
    /// has elapsed. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build_command(&self, request: &PlaybookRequest) -> Result<CommandSpec> {
        exec::build_command(&self.binary, &self.working_dir, request)
    }

    /// Run `request` and return the child's exit code (always 0 on `Ok`).
    ///
    /// `NonBlocking` spins up a current-thread Tokio runtime for the duration
    /// of the call; hosts that already own a runtime should await
    /// [`run_async`](Self::run_async) directly instead.
    pub fn run(&self, request: &PlaybookRequest, mode: ExecMode) -> Result<i32> {
        debug!(%mode, playbook = %request.playbook, "running playbook");
        match mode {
            ExecMode::Blocking => self.run_blocking(request),
            ExecMode::NonBlocking => {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .context("building Tokio runtime for non-blocking execution")?;
                rt.block_on(self.run_async(request))
            }
        }
    }

    pub fn run_blocking(&self, request: &PlaybookRequest) -> Result<i32> {
        let cmd = self.build_command(request)?;
        exec::run_blocking(&cmd, &self.working_dir, self.timeout)
    }

    pub async fn run_async(&self, request: &PlaybookRequest) -> Result<i32> {
        let cmd = self.build_command(request)?;
        exec::run_async(&cmd, &self.working_dir, self.timeout).await
    }
}
