// src/exec/nonblocking.rs

//! Non-blocking execution on a Tokio runtime.
//!
//! Draining both pipes and waiting for exit are plain `.await`s on the
//! current task, so a current-thread runtime is enough and other tasks on
//! the same runtime keep making progress while the playbook runs.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{Result, RunnerError};
use crate::exec::command::CommandSpec;
use crate::exec::group;
use crate::exec::outcome::{ProcessOutput, launch_error, record_line};
use crate::types::Stream;

/// Async counterpart of [`run_blocking`](crate::exec::run_blocking).
pub async fn run_async(
    cmd: &CommandSpec,
    working_dir: &Path,
    deadline: Option<Duration>,
) -> Result<i32> {
    info!("executing async: {}", cmd);

    let mut command = Command::new(cmd.program());
    command
        .args(cmd.args())
        .current_dir(working_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if deadline.is_some() {
        group::isolate_tokio(&mut command);
    }
    let mut child = command.spawn().map_err(|e| launch_error(cmd, e))?;

    debug!(pid = ?child.id(), "playbook process started");

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let run = async {
        let (stdout, stderr) = tokio::join!(
            drain(stdout, Stream::Stdout),
            drain(stderr, Stream::Stderr)
        );
        let status = child.wait().await?;
        Ok::<_, RunnerError>(ProcessOutput::new(status, stdout, stderr))
    };

    let output = match deadline {
        None => run.await?,
        Some(limit) => {
            let timed = tokio::time::timeout(limit, run).await;
            match timed {
                Ok(res) => res?,
                Err(_) => {
                    warn!(timeout = ?limit, "deadline reached; killing playbook process group");
                    let killed = match child.id() {
                        Some(pid) => group::kill_group(pid).or_else(|_| child.start_kill()),
                        None => Ok(()),
                    };
                    if let Err(e) = killed {
                        warn!(error = %e, "failed to kill playbook process");
                    }
                    child.wait().await?;
                    return Err(RunnerError::Timeout { after: limit });
                }
            }
        }
    };

    output.into_result()
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>, stream: Stream) -> String {
    let mut captured = String::new();
    let Some(pipe) = pipe else {
        return captured;
    };

    let mut reader = BufReader::new(pipe);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => record_line(stream, &line, &mut captured),
            Err(e) => {
                warn!(%stream, error = %e, "failed reading child output; giving up on stream");
                break;
            }
        }
    }
    captured
}
