// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] turns a [`PlaybookRequest`] into a validated argv.
//! - [`blocking`] runs it on the calling thread with `std::process`.
//! - [`nonblocking`] runs it as futures with `tokio::process`.
//! - [`outcome`] is shared by both: line streaming into the log and exit
//!   status mapping.
//! - `group` puts a deadline-bound child in its own process group so expiry
//!   kills its descendants too.

pub mod blocking;
pub mod command;
mod group;
pub mod nonblocking;
pub mod outcome;

pub use blocking::run_blocking;
pub use command::{CommandSpec, PlaybookRequest, build_command};
pub use nonblocking::run_async;
pub use outcome::ProcessOutput;
