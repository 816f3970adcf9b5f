// tests/executor_blocking.rs

#![cfg(unix)]

use std::error::Error;
use std::time::{Duration, Instant};

use playbook_runner::errors::{ErrorKind, RunnerError};
use playbook_runner::exec::{run_blocking, PlaybookRequest};
use playbook_runner::vars::parse_cli_tokens;
use playbook_runner::{ExecMode, PlaybookRunner};
use playbook_runner_test_utils::fixtures::Workspace;
use playbook_runner_test_utils::init_tracing;
use playbook_runner_test_utils::scripted::{ScriptedPlaybook, SHELL};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn successful_run_returns_zero() -> TestResult {
    init_tracing();
    let ws = Workspace::new()?;
    ScriptedPlaybook::new()
        .stdout_line("PLAY [all]")
        .stderr_line("[WARNING]: no inventory")
        .write_to(&ws, "play.sh")?;

    let runner = PlaybookRunner::new(ws.path(), SHELL);
    let code = runner.run(&PlaybookRequest::new("play.sh"), ExecMode::Blocking)?;

    assert_eq!(code, 0);
    Ok(())
}

#[test]
fn non_zero_exit_carries_code_and_output() -> TestResult {
    init_tracing();
    let ws = Workspace::new()?;
    ScriptedPlaybook::new()
        .stdout_line("TASK [ping]")
        .stderr_line("fatal: unreachable")
        .exit_code(4)
        .write_to(&ws, "play.sh")?;

    let runner = PlaybookRunner::new(ws.path(), SHELL);
    let result = runner.run_blocking(&PlaybookRequest::new("play.sh"));

    match result {
        Err(e @ RunnerError::Execution { .. }) => {
            assert_eq!(e.kind(), ErrorKind::Execution);
            assert_eq!(e.exit_code(), Some(4));
            assert_eq!(e.to_string(), "Process failed with exit code 4");
            if let RunnerError::Execution { stdout, stderr, .. } = e {
                assert_eq!(stdout, "TASK [ping]\n");
                assert_eq!(stderr, "fatal: unreachable\n");
            }
        }
        other => panic!("Expected Execution error, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn child_runs_in_working_dir_with_built_arguments() -> TestResult {
    init_tracing();
    let ws = Workspace::new()?;
    ws.write("hosts.ini", "[web]\nweb01\n")?;
    ScriptedPlaybook::new()
        .print_cwd()
        .echo_args()
        .exit_code(1)
        .write_to(&ws, "play.sh")?;

    let request = PlaybookRequest::new("play.sh")
        .with_inventory("hosts.ini")
        .with_extra_vars(parse_cli_tokens(&["env=prod"])?)
        .with_dry_run(true);
    let runner = PlaybookRunner::new(ws.path(), SHELL);

    let Err(RunnerError::Execution { stdout, .. }) = runner.run_blocking(&request) else {
        panic!("script exits 1, expected Execution error");
    };

    let base = ws.canonical();
    let expected = format!(
        "cwd={}\narg=-i\narg={}\narg=--extra-vars\narg={{\"env\": \"prod\"}}\narg=--check\n",
        base.display(),
        base.join("hosts.ini").display()
    );
    assert_eq!(stdout, expected);
    Ok(())
}

#[test]
fn deadline_kills_the_child() -> TestResult {
    init_tracing();
    let ws = Workspace::new()?;
    // The sleeper is a separate process that shares the output pipes.
    ScriptedPlaybook::new()
        .stdout_line("starting")
        .sleep_secs(6)
        .write_to(&ws, "slow.sh")?;

    let runner =
        PlaybookRunner::new(ws.path(), SHELL).with_timeout(Some(Duration::from_millis(300)));
    let started = Instant::now();
    let result = runner.run_blocking(&PlaybookRequest::new("slow.sh"));

    match result {
        Err(RunnerError::Timeout { after }) => assert_eq!(after, Duration::from_millis(300)),
        other => panic!("Expected Timeout, got: {:?}", other),
    }
    assert!(
        started.elapsed() < Duration::from_secs(3),
        "timeout took {:?}",
        started.elapsed()
    );
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn deadline_kills_processes_started_by_the_playbook() -> TestResult {
    use playbook_runner_test_utils::scripted::SLEEPER_PID_FILE;
    use playbook_runner_test_utils::wait_for_exit;

    init_tracing();
    let ws = Workspace::new()?;
    ScriptedPlaybook::new()
        .background_sleep_secs(6)
        .write_to(&ws, "forks.sh")?;

    let runner =
        PlaybookRunner::new(ws.path(), SHELL).with_timeout(Some(Duration::from_millis(300)));
    let started = Instant::now();
    let result = runner.run_blocking(&PlaybookRequest::new("forks.sh"));

    assert!(matches!(result, Err(RunnerError::Timeout { .. })));
    assert!(started.elapsed() < Duration::from_secs(3));

    let pid: u32 = ws.read(SLEEPER_PID_FILE)?.trim().parse()?;
    assert!(wait_for_exit(pid), "background sleeper {pid} survived the deadline");
    Ok(())
}

#[test]
fn fast_child_finishes_before_deadline() -> TestResult {
    init_tracing();
    let ws = Workspace::new()?;
    ScriptedPlaybook::new().stdout_line("ok").write_to(&ws, "play.sh")?;

    let runner = PlaybookRunner::new(ws.path(), SHELL).with_timeout(Some(Duration::from_secs(30)));

    assert_eq!(runner.run_blocking(&PlaybookRequest::new("play.sh"))?, 0);
    Ok(())
}

#[test]
fn missing_binary_is_unexpected() -> TestResult {
    init_tracing();
    let ws = Workspace::new()?;
    ScriptedPlaybook::new().write_to(&ws, "play.sh")?;

    let runner = PlaybookRunner::new(ws.path(), "definitely-not-an-installed-binary-4711");
    let err = runner.run_blocking(&PlaybookRequest::new("play.sh")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(matches!(err, RunnerError::Unexpected(_)));
    assert!(format!("{:#}", err).contains("not found on PATH"));
    Ok(())
}

#[test]
fn missing_playbook_fails_before_launch() -> TestResult {
    let ws = Workspace::new()?;
    let runner = PlaybookRunner::new(ws.path(), SHELL);

    let err = runner.run_blocking(&PlaybookRequest::new("absent.yml")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Path);
    Ok(())
}

#[test]
fn chatty_child_does_not_stall_on_full_pipes() -> TestResult {
    init_tracing();
    let ws = Workspace::new()?;
    let mut script = ScriptedPlaybook::new();
    for i in 0..2000 {
        let line = format!("line {i} {}", "x".repeat(64));
        script = script.stdout_line(&line).stderr_line(&line);
    }
    script.exit_code(2).write_to(&ws, "chatty.sh")?;

    let runner = PlaybookRunner::new(ws.path(), SHELL).with_timeout(Some(Duration::from_secs(30)));
    let Err(RunnerError::Execution { stdout, stderr, .. }) =
        runner.run_blocking(&PlaybookRequest::new("chatty.sh"))
    else {
        panic!("script exits 2, expected Execution error");
    };

    assert_eq!(stdout.lines().count(), 2000);
    assert_eq!(stderr.lines().count(), 2000);
    Ok(())
}

#[test]
fn free_function_runs_a_prebuilt_command() -> TestResult {
    init_tracing();
    let ws = Workspace::new()?;
    ScriptedPlaybook::new().exit_code(7).write_to(&ws, "play.sh")?;

    let runner = PlaybookRunner::new(ws.path(), SHELL);
    let cmd = runner.build_command(&PlaybookRequest::new("play.sh"))?;
    let err = run_blocking(&cmd, ws.path(), None).unwrap_err();

    assert_eq!(err.exit_code(), Some(7));
    Ok(())
}
