use std::fmt;

/// How a playbook process is driven.
///
/// - `Blocking`: the calling thread waits for the child; pipes are drained by
///   scoped reader threads.
/// - `NonBlocking`: the child is driven by futures on a Tokio runtime; every
///   wait is an `.await`, so other tasks on the same runtime keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    Blocking,
    NonBlocking,
}

impl ExecMode {
    /// `--async` on the command line or `runner.enable_async` in the config
    /// both select the non-blocking path.
    pub fn select(cli_async: bool, config_async: bool) -> Self {
        if cli_async || config_async {
            ExecMode::NonBlocking
        } else {
            ExecMode::Blocking
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecMode::Blocking => f.write_str("blocking"),
            ExecMode::NonBlocking => f.write_str("non-blocking"),
        }
    }
}

/// Which pipe of the child a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => f.write_str("stdout"),
            Stream::Stderr => f.write_str("stderr"),
        }
    }
}
