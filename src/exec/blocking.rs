// src/exec/blocking.rs

//! Blocking execution: the calling thread owns the child until it exits.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use tracing::{Dispatch, debug, dispatcher, info, warn};

use crate::errors::{Result, RunnerError};
use crate::exec::command::CommandSpec;
use crate::exec::group;
use crate::exec::outcome::{ProcessOutput, launch_error, record_line};
use crate::types::Stream;

/// How often the child is polled while a deadline is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run `cmd` in `working_dir`, streaming both pipes into the log line by line.
///
/// Each pipe is drained by its own scoped thread so neither can fill up and
/// stall the child; ordering between the two streams is whatever the OS
/// delivers. The caller's tracing dispatcher is carried into the reader
/// threads, so lines land in the same sinks as the rest of the run.
pub fn run_blocking(
    cmd: &CommandSpec,
    working_dir: &Path,
    deadline: Option<Duration>,
) -> Result<i32> {
    info!("executing: {}", cmd);

    let mut command = Command::new(cmd.program());
    command
        .args(cmd.args())
        .current_dir(working_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if deadline.is_some() {
        group::isolate_std(&mut command);
    }
    let mut child = command.spawn().map_err(|e| launch_error(cmd, e))?;

    debug!(pid = child.id(), "playbook process started");

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let dispatch = dispatcher::get_default(Dispatch::clone);

    let (status, stdout, stderr) = thread::scope(|scope| {
        let dispatch = &dispatch;
        let out_reader = scope.spawn(move || {
            dispatcher::with_default(dispatch, || drain(stdout, Stream::Stdout))
        });
        let err_reader = scope.spawn(move || {
            dispatcher::with_default(dispatch, || drain(stderr, Stream::Stderr))
        });

        let status = wait_with_deadline(&mut child, deadline);
        (status, out_reader.join(), err_reader.join())
    });

    let status = status?;
    let stdout = stdout.map_err(|_| anyhow!("stdout reader thread panicked"))?;
    let stderr = stderr.map_err(|_| anyhow!("stderr reader thread panicked"))?;

    ProcessOutput::new(status, stdout, stderr).into_result()
}

fn drain<R: Read>(pipe: Option<R>, stream: Stream) -> String {
    let mut captured = String::new();
    let Some(pipe) = pipe else {
        return captured;
    };

    let mut reader = BufReader::new(pipe);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
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

fn wait_with_deadline(child: &mut Child, deadline: Option<Duration>) -> Result<ExitStatus> {
    let Some(limit) = deadline else {
        return Ok(child.wait()?);
    };

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if started.elapsed() >= limit {
            warn!(timeout = ?limit, "deadline reached; killing playbook process group");
            // Descendants hold the pipes too; the readers only finish once
            // the whole group is gone.
            if let Err(e) = group::kill_group(child.id()).or_else(|_| child.kill()) {
                warn!(error = %e, "failed to kill playbook process");
            }
            child.wait()?;
            return Err(RunnerError::Timeout { after: limit });
        }
        thread::sleep(POLL_INTERVAL);
    }
}
