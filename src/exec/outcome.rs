// src/exec/outcome.rs

//! Pieces shared by the blocking and non-blocking paths.

use std::io;
use std::process::ExitStatus;

use anyhow::anyhow;
use tracing::{error, info};

use crate::errors::{Result, RunnerError};
use crate::exec::command::CommandSpec;
use crate::paths::find_executable;
use crate::types::Stream;

/// Everything observed from a finished child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `-1` when the child was terminated by a signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn new(status: ExitStatus, stdout: String, stderr: String) -> Self {
        Self {
            code: status.code().unwrap_or(-1),
            stdout,
            stderr,
        }
    }

    /// Exit code 0 is success; anything else becomes `RunnerError::Execution`.
    pub fn into_result(self) -> Result<i32> {
        info!(exit_code = self.code, success = self.code == 0, "playbook process exited");
        if self.code == 0 {
            Ok(0)
        } else {
            Err(RunnerError::Execution {
                code: self.code,
                stdout: self.stdout,
                stderr: self.stderr,
            })
        }
    }
}

/// Log one raw line from the child and append it to the capture buffer.
///
/// stdout goes to INFO, stderr to ERROR. Blank lines are kept in the
/// buffer but not logged.
pub(crate) fn record_line(stream: Stream, raw: &[u8], captured: &mut String) {
    let text = String::from_utf8_lossy(raw);
    let line = text.trim_end();

    if !line.is_empty() {
        match stream {
            Stream::Stdout => info!("{}", line),
            Stream::Stderr => error!("{}", line),
        }
    }

    captured.push_str(line);
    captured.push('\n');
}

/// Spawn failures happen before there is an exit code, so they are reported
/// as unexpected errors with a hint about where the executable was looked up.
pub(crate) fn launch_error(cmd: &CommandSpec, err: io::Error) -> RunnerError {
    let program = cmd.program();
    let hint = match find_executable(program) {
        Some(path) => format!("resolved to {:?}", path),
        None => "not found on PATH".to_string(),
    };
    RunnerError::Unexpected(anyhow!(err).context(format!("launching '{program}' ({hint})")))
}
