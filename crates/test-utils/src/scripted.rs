//! Stand-in for a real playbook run.
//!
//! Tests configure `binary = "sh"` and point `--playbook` at a shell script
//! generated here, so the runner launches `sh <script> [-i ..] [--extra-vars ..]
//! [--check]`. The script prints known output, can echo its arguments and
//! working directory, and exits with a chosen code. Nothing is exec'd
//! directly, so there is no chmod and no "text file busy" race.

use std::path::PathBuf;

use anyhow::Result;

use crate::fixtures::Workspace;

/// Binary to configure alongside a [`ScriptedPlaybook`].
pub const SHELL: &str = "sh";

/// Where [`ScriptedPlaybook::background_sleep_secs`] records the sleeper.
pub const SLEEPER_PID_FILE: &str = "sleeper.pid";

#[derive(Debug, Clone, Default)]
pub struct ScriptedPlaybook {
    stdout: Vec<String>,
    stderr: Vec<String>,
    exit_code: i32,
    sleep_secs: Option<u64>,
    background_sleep_secs: Option<u64>,
    echo_args: bool,
    print_cwd: bool,
}

impl ScriptedPlaybook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout_line(mut self, line: &str) -> Self {
        self.stdout.push(line.to_string());
        self
    }

    pub fn stderr_line(mut self, line: &str) -> Self {
        self.stderr.push(line.to_string());
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Run `sleep` as a separate process before exiting. Like the workers of
    /// a real playbook run, the sleeper inherits the output pipes and
    /// outlives a kill aimed at the script alone.
    pub fn sleep_secs(mut self, secs: u64) -> Self {
        self.sleep_secs = Some(secs);
        self
    }

    /// Start `sleep` in the background, record its pid in `SLEEPER_PID_FILE`
    /// (relative to the working directory) and wait for it.
    pub fn background_sleep_secs(mut self, secs: u64) -> Self {
        self.background_sleep_secs = Some(secs);
        self
    }

    /// Print every argument after the script as `arg=<value>`.
    pub fn echo_args(mut self) -> Self {
        self.echo_args = true;
        self
    }

    /// Print the physical working directory as `cwd=<path>`.
    pub fn print_cwd(mut self) -> Self {
        self.print_cwd = true;
        self
    }

    pub fn script(&self) -> String {
        let mut body = String::from("#!/bin/sh\n");
        if self.print_cwd {
            body.push_str("echo \"cwd=$(pwd -P)\"\n");
        }
        if self.echo_args {
            body.push_str("for a in \"$@\"; do echo \"arg=$a\"; done\n");
        }
        for line in &self.stdout {
            body.push_str(&format!("echo {}\n", quote(line)));
        }
        for line in &self.stderr {
            body.push_str(&format!("echo {} >&2\n", quote(line)));
        }
        if let Some(secs) = self.background_sleep_secs {
            body.push_str(&format!(
                "sleep {secs} &\necho $! > {SLEEPER_PID_FILE}\nwait\n"
            ));
        }
        if let Some(secs) = self.sleep_secs {
            body.push_str(&format!("sleep {secs}\n"));
        }
        body.push_str(&format!("exit {}\n", self.exit_code));
        body
    }

    /// Write the script into `workspace` as `name`.
    pub fn write_to(&self, workspace: &Workspace, name: &str) -> Result<PathBuf> {
        workspace.write(name, &self.script())
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
