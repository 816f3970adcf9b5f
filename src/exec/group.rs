// src/exec/group.rs

//! Process-group handling for the deadline.
//!
//! `ansible-playbook` forks workers and ssh connections that inherit the
//! output pipes. When a deadline is armed the playbook is started as the
//! leader of a fresh process group, and expiry signals the whole group so
//! no descendant outlives the run or keeps the pipes open.

use std::io;

/// Start the child as the leader of its own process group.
pub(crate) fn isolate_std(command: &mut std::process::Command) {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    #[cfg(not(unix))]
    let _ = command;
}

/// Tokio flavour of [`isolate_std`].
pub(crate) fn isolate_tokio(command: &mut tokio::process::Command) {
    #[cfg(unix)]
    command.process_group(0);
    #[cfg(not(unix))]
    let _ = command;
}

/// SIGKILL every process in the group led by `pid`.
///
/// A group that is already gone counts as killed.
#[cfg(unix)]
pub(crate) fn kill_group(pid: u32) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let pgid = i32::try_from(pid).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(errno.into()),
    }
}

#[cfg(not(unix))]
pub(crate) fn kill_group(_pid: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "process groups are not available on this platform",
    ))
}
