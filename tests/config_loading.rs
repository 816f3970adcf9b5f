// tests/config_loading.rs

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use playbook_runner::config::{
    load_and_validate, load_from_path, parse_str, ConfigFile, ConfigFormat,
};
use playbook_runner::errors::{ErrorKind, RunnerError};
use playbook_runner_test_utils::builders::ConfigFileBuilder;
use playbook_runner_test_utils::fixtures::Workspace;
use serde_json::json;
use tempfile::NamedTempFile;

type TestResult = Result<(), Box<dyn Error>>;

const FULL_TOML: &str = r#"
[ansible]
binary = "/usr/bin/ansible-playbook"
default_playbook = "site.yml"
default_inventory = "hosts.ini"
working_dir = "/srv/playbooks"

[ansible.default_extra_vars]
env = "staging"
replicas = 2

[logging]
level = "DEBUG"
file = "logs/runner.log"
max_bytes = 1024
backup_count = 3

[runner]
timeout_seconds = 60
enable_async = true
"#;

const FULL_YAML: &str = r#"
ansible:
  binary: /usr/bin/ansible-playbook
  default_playbook: site.yml
  default_inventory: hosts.ini
  working_dir: /srv/playbooks
  default_extra_vars:
    env: staging
    replicas: 2
logging:
  level: DEBUG
  file: logs/runner.log
  max_bytes: 1024
  backup_count: 3
runner:
  timeout_seconds: 60
  enable_async: true
"#;

fn toml_file(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    write!(file, "{}", contents)?;
    Ok(file)
}

#[test]
fn full_toml_config_loads() -> TestResult {
    let file = toml_file(FULL_TOML)?;

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.ansible.binary, "/usr/bin/ansible-playbook");
    assert_eq!(cfg.ansible.default_playbook.as_deref(), Some("site.yml"));
    assert_eq!(cfg.ansible.default_inventory.as_deref(), Some("hosts.ini"));
    assert_eq!(cfg.ansible.working_dir, PathBuf::from("/srv/playbooks"));
    assert_eq!(cfg.ansible.default_extra_vars["env"], json!("staging"));
    assert_eq!(cfg.ansible.default_extra_vars["replicas"], json!(2));
    assert_eq!(cfg.logging.level, "DEBUG");
    assert_eq!(cfg.logging.file, Some(PathBuf::from("logs/runner.log")));
    assert_eq!(cfg.logging.max_bytes, 1024);
    assert_eq!(cfg.logging.backup_count, 3);
    assert_eq!(cfg.runner.timeout(), Some(Duration::from_secs(60)));
    assert!(cfg.runner.enable_async);
    Ok(())
}

#[test]
fn yaml_and_toml_describe_the_same_config() -> TestResult {
    let ws = Workspace::new()?;
    let yaml_path = ws.write("config.yaml", FULL_YAML)?;
    let toml_path = ws.write("config.toml", FULL_TOML)?;

    let from_yaml = load_and_validate(&yaml_path)?;
    let from_toml = load_and_validate(&toml_path)?;

    assert_eq!(from_yaml.ansible.binary, from_toml.ansible.binary);
    assert_eq!(from_yaml.ansible.working_dir, from_toml.ansible.working_dir);
    assert_eq!(
        from_yaml.ansible.default_extra_vars,
        from_toml.ansible.default_extra_vars
    );
    assert_eq!(from_yaml.logging.file, from_toml.logging.file);
    assert_eq!(from_yaml.runner.timeout_seconds, from_toml.runner.timeout_seconds);
    assert_eq!(from_yaml.runner.enable_async, from_toml.runner.enable_async);
    Ok(())
}

#[test]
fn format_is_picked_from_extension() {
    assert_eq!(ConfigFormat::from_path("a/config.yml".as_ref()), ConfigFormat::Yaml);
    assert_eq!(ConfigFormat::from_path("config.YAML".as_ref()), ConfigFormat::Yaml);
    assert_eq!(ConfigFormat::from_path("config.toml".as_ref()), ConfigFormat::Toml);
    assert_eq!(ConfigFormat::from_path("config".as_ref()), ConfigFormat::Toml);
}

#[test]
fn minimal_config_gets_defaults() -> TestResult {
    let raw = parse_str("[ansible]\nbinary = \"ansible-playbook\"\n", ConfigFormat::Toml)?;
    let cfg = ConfigFile::try_from(raw)?;

    assert_eq!(cfg.ansible.default_playbook, None);
    assert_eq!(cfg.ansible.default_inventory, None);
    assert!(cfg.ansible.default_extra_vars.is_empty());
    assert_eq!(cfg.ansible.working_dir, PathBuf::from("."));
    assert_eq!(cfg.logging.level, "INFO");
    assert_eq!(cfg.logging.file, None);
    assert_eq!(cfg.logging.max_bytes, 10 * 1024 * 1024);
    assert_eq!(cfg.logging.backup_count, 5);
    assert_eq!(cfg.runner.timeout_seconds, 3600);
    assert!(!cfg.runner.enable_async);
    Ok(())
}

#[test]
fn zero_timeout_disables_deadline() -> TestResult {
    let raw = parse_str(
        "[ansible]\nbinary = \"ansible-playbook\"\n[runner]\ntimeout_seconds = 0\n",
        ConfigFormat::Toml,
    )?;
    let cfg = ConfigFile::try_from(raw)?;
    assert_eq!(cfg.runner.timeout(), None);
    Ok(())
}

#[test]
fn missing_ansible_section_is_a_validation_error() -> TestResult {
    let file = toml_file("[logging]\nlevel = \"INFO\"\n")?;

    match load_and_validate(file.path()) {
        Err(e @ RunnerError::Toml(_)) => assert_eq!(e.kind(), ErrorKind::Validation),
        other => panic!("Expected Toml error, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn missing_binary_is_a_validation_error() -> TestResult {
    let result = parse_str("ansible:\n  default_playbook: site.yml\n", ConfigFormat::Yaml);

    match result {
        Err(e @ RunnerError::Yaml(_)) => {
            assert_eq!(e.kind(), ErrorKind::Validation);
            assert!(e.to_string().contains("binary"));
        }
        other => panic!("Expected Yaml error, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn invalid_toml_syntax_is_rejected() -> TestResult {
    let file = toml_file("[ansible\nbinary = ")?;
    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, RunnerError::Toml(_)));
    Ok(())
}

#[test]
fn empty_binary_is_rejected() -> TestResult {
    let ws = Workspace::new()?;
    let raw = ConfigFileBuilder::new(ws.path()).with_binary("  ").build_raw();

    match ConfigFile::try_from(raw) {
        Err(RunnerError::Config(msg)) => assert!(msg.contains("binary")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn unknown_log_level_is_rejected() -> TestResult {
    let ws = Workspace::new()?;
    let raw = ConfigFileBuilder::new(ws.path()).with_log_level("LOUD").build_raw();

    match ConfigFile::try_from(raw) {
        Err(RunnerError::Config(msg)) => assert!(msg.contains("LOUD")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn level_names_are_case_insensitive() -> TestResult {
    let ws = Workspace::new()?;
    for level in ["debug", "Warning", "ERROR", "critical", "trace"] {
        let raw = ConfigFileBuilder::new(ws.path()).with_log_level(level).build_raw();
        ConfigFile::try_from(raw)?;
    }
    Ok(())
}

#[test]
fn empty_extra_var_key_is_rejected() -> TestResult {
    let ws = Workspace::new()?;
    let raw = ConfigFileBuilder::new(ws.path())
        .with_default_extra_var("", "x")
        .build_raw();

    assert!(matches!(ConfigFile::try_from(raw), Err(RunnerError::Config(_))));
    Ok(())
}

#[test]
fn empty_log_file_is_rejected() -> TestResult {
    let ws = Workspace::new()?;
    let raw = ConfigFileBuilder::new(ws.path()).with_log_file("").build_raw();

    assert!(matches!(ConfigFile::try_from(raw), Err(RunnerError::Config(_))));
    Ok(())
}

#[test]
fn missing_file_reports_path() {
    let missing = PathBuf::from("/definitely/not/here/config.toml");

    match load_from_path(&missing) {
        Err(e @ RunnerError::ConfigIo { .. }) => {
            assert_eq!(e.kind(), ErrorKind::Validation);
            assert!(e.to_string().contains("config.toml"));
        }
        other => panic!("Expected ConfigIo error, got: {:?}", other),
    }
}
