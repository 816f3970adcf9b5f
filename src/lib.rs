// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod paths;
pub mod runner;
pub mod types;
pub mod vars;

use tracing::{dispatcher, error, info};

use crate::cli::{CliArgs, LogLevel};
use crate::config::{AnsibleSection, ConfigFile, load_and_validate, timeout_from_secs};

pub use crate::errors::{ErrorKind, Result, RunnerError};
pub use crate::exec::{CommandSpec, PlaybookRequest};
pub use crate::runner::PlaybookRunner;
pub use crate::types::ExecMode;

/// High-level entry point used by `main.rs`; returns the process exit code.
///
/// This wires together:
/// - config loading
/// - the logger registry (scoped to this call, not installed globally)
/// - CLI overrides on top of config defaults
/// - the playbook runner
///
/// Every error ends here: it is logged once and mapped to exit code 1.
pub fn run(args: CliArgs) -> i32 {
    let cfg = match load_and_validate(&args.config) {
        Ok(cfg) => cfg,
        Err(err) => return report_without_config(&err, args.log_level),
    };

    let registry = match logging::registry_from_config(&cfg.logging, args.log_level) {
        Ok(registry) => registry,
        Err(err) => return report_without_config(&err, args.log_level),
    };

    let dispatch = registry.dispatch();
    dispatcher::with_default(&dispatch, || match execute(&args, &cfg) {
        Ok(code) => {
            info!("playbook completed successfully");
            code
        }
        Err(err) => {
            report_failure(&err);
            1
        }
    })
}

/// Resolve overrides against `cfg` and run the playbook once.
pub fn execute(args: &CliArgs, cfg: &ConfigFile) -> Result<i32> {
    let request = build_request(args, &cfg.ansible)?;

    let mode = ExecMode::select(args.use_async, cfg.runner.enable_async);
    let timeout = match args.timeout {
        Some(secs) => timeout_from_secs(secs),
        None => cfg.runner.timeout(),
    };

    let runner = PlaybookRunner::new(&cfg.ansible.working_dir, &cfg.ansible.binary)
        .with_timeout(timeout);

    info!(
        %mode,
        playbook = %request.playbook,
        inventory = ?request.inventory,
        dry_run = request.dry_run,
        ?timeout,
        "starting playbook run"
    );
    runner.run(&request, mode)
}

/// Build the request from CLI flags, falling back to `[ansible]` defaults.
///
/// `--extra-vars` is merged key by key over `default_extra_vars`.
pub fn build_request(args: &CliArgs, ansible: &AnsibleSection) -> Result<PlaybookRequest> {
    let playbook = non_empty(args.playbook.as_deref())
        .or_else(|| non_empty(ansible.default_playbook.as_deref()))
        .ok_or_else(|| {
            RunnerError::Config(
                "no playbook given: pass --playbook or set [ansible].default_playbook"
                    .to_string(),
            )
        })?;

    let inventory = non_empty(args.inventory.as_deref())
        .or_else(|| non_empty(ansible.default_inventory.as_deref()));

    let overrides = vars::parse_cli_tokens(&args.extra_vars)?;
    let extra_vars = vars::merge(&ansible.default_extra_vars, overrides);

    Ok(PlaybookRequest {
        playbook: playbook.to_string(),
        inventory: inventory.map(str::to_string),
        extra_vars,
        dry_run: args.dry_run,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Failures before the configured registry exists are logged through a
/// console-only one.
fn report_without_config(err: &RunnerError, cli_level: Option<LogLevel>) -> i32 {
    let registry = logging::bootstrap_registry(cli_level);
    dispatcher::with_default(&registry.dispatch(), || report_failure(err));
    1
}

fn report_failure(err: &RunnerError) {
    match err {
        RunnerError::Unexpected(inner) => error!("unexpected error: {inner:?}"),
        other if other.kind() == ErrorKind::Unexpected => error!("unexpected error: {other:?}"),
        other => error!("execution failed: {other}"),
    }
}
