mod common;
use crate::common::builders::{CommandBuilder, ConfigFileBuilder};
use crate::common::init_tracing;

use std::error::Error;
use std::io::Write;

use devloop::cli::CliCommand;
use devloop::config::{load_and_validate, load_from_str, ConfigFile};
use devloop::errors::DevloopError;
use devloop::{select, select_commands, Selection};

type TestResult = Result<(), Box<dyn Error>>;

const SAMPLE: &str = r#"
[env]
SRC_LOG_LEVEL = "info"

[commands.api]
install = "go build -o .bin/api ./cmd/api"
cmd = ".bin/api"
watch = ["backend/", "internal/"]

[commands.api.env]
PORT = "3090"

[commands.web]
cmd = "yarn run serve"
watch = ["client/"]

[commandsets]
default = ["web", "api"]
backend = ["api"]

[tests.backend]
install = "go build ./..."
cmd = "go test ./backend/..."

[tests.backend.env]
GOFLAGS = "-count=1"

[tests.frontend]
cmd = "yarn test"
"#;

fn sample() -> Result<ConfigFile, DevloopError> {
    ConfigFile::try_from(load_from_str(SAMPLE)?)
}

#[test]
fn parses_commands_env_and_sets() -> TestResult {
    init_tracing();
    let cfg = sample()?;

    assert_eq!(cfg.global_env().get("SRC_LOG_LEVEL").map(String::as_str), Some("info"));

    let api = cfg.command("api")?;
    assert_eq!(api.name, "api");
    assert_eq!(api.install, "go build -o .bin/api ./cmd/api");
    assert_eq!(api.cmd, ".bin/api");
    assert_eq!(api.watch, vec!["backend/", "internal/"]);
    assert_eq!(api.env.get("PORT").map(String::as_str), Some("3090"));
    assert!(api.has_install());

    let web = cfg.command("web")?;
    assert!(!web.has_install(), "install defaults to empty");
    assert!(web.env.is_empty());

    let names: Vec<&str> = cfg.command_names().collect();
    assert_eq!(names, vec!["api", "web"]);
    Ok(())
}

#[test]
fn command_set_preserves_declared_order() -> TestResult {
    let cfg = sample()?;
    let set = cfg.command_set("default")?;
    let names: Vec<&str> = set.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["web", "api"]);
    Ok(())
}

#[test]
fn unknown_command_lists_available_names() -> TestResult {
    let cfg = sample()?;
    let err = cfg.command("worker").unwrap_err();

    match &err {
        DevloopError::CommandNotFound { name, available } => {
            assert_eq!(name, "worker");
            assert_eq!(available, "api, web");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("\"worker\" not found"));
    Ok(())
}

#[test]
fn unknown_command_set_is_reported() -> TestResult {
    let cfg = sample()?;
    let err = cfg.command_set("frontend").unwrap_err();
    assert!(
        matches!(&err, DevloopError::CommandSetNotFound { name, .. } if name == "frontend"),
        "unexpected error: {err:?}"
    );
    Ok(())
}

#[test]
fn set_member_without_command_is_reported_on_lookup() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_command("api", CommandBuilder::new("api", "sleep 1").config())
        .with_command_set("default", &["api", "ghost"])
        .build();

    let err = cfg.command_set("default").unwrap_err();
    match err {
        DevloopError::UnknownCommandInSet { command, set } => {
            assert_eq!(command, "ghost");
            assert_eq!(set, "default");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn config_without_commands_is_rejected() -> TestResult {
    let raw = load_from_str("[env]\nA = \"1\"\n")?;
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, DevloopError::ConfigError(_)), "got {err:?}");
    Ok(())
}

#[test]
fn blank_cmd_is_rejected() -> TestResult {
    let raw = load_from_str("[commands.api]\ncmd = \"   \"\n")?;
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(err.to_string().contains("command 'api' has an empty `cmd`"), "got {err}");
    Ok(())
}

#[test]
fn missing_cmd_is_a_toml_error() {
    let err = load_from_str("[commands.api]\ninstall = \"make\"\n").unwrap_err();
    assert!(matches!(err, DevloopError::TomlError(_)), "got {err:?}");
}

#[test]
fn empty_command_set_is_rejected() -> TestResult {
    let raw = load_from_str("[commands.api]\ncmd = \"x\"\n\n[commandsets]\ndefault = []\n")?;
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(err.to_string().contains("commandset 'default'"), "got {err}");
    Ok(())
}

#[test]
fn loads_from_disk() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(SAMPLE.as_bytes())?;

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.command_set("backend")?.len(), 1);
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_and_validate("/definitely/not/here/devloop.toml").unwrap_err();
    assert!(matches!(err, DevloopError::IoError(_)), "got {err:?}");
}

#[test]
fn subcommands_select_commands() -> TestResult {
    let cfg = sample()?;

    let single = select_commands(&cfg, &CliCommand::Run { name: "api".into() })?;
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].name, "api");

    let set = select_commands(&cfg, &CliCommand::RunSet { name: "backend".into() })?;
    assert_eq!(set[0].name, "api");

    let start = select_commands(&cfg, &CliCommand::Start)?;
    let names: Vec<&str> = start.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["web", "api"]);

    let err = select_commands(&cfg, &CliCommand::Run { name: "nope".into() }).unwrap_err();
    assert!(matches!(err, DevloopError::CommandNotFound { .. }));
    Ok(())
}

#[test]
fn start_without_default_set_fails() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_command("api", CommandBuilder::new("api", "sleep 1").config())
        .build();
    let err = select_commands(&cfg, &CliCommand::Start).unwrap_err();
    assert!(
        matches!(&err, DevloopError::CommandSetNotFound { name, available } if name == "default" && available == "none"),
        "got {err:?}"
    );
    Ok(())
}

#[test]
fn parses_test_suites() -> TestResult {
    let cfg = sample()?;

    let suite = cfg.test_suite("backend")?;
    assert_eq!(suite.name, "backend");
    assert_eq!(suite.install, "go build ./...");
    assert_eq!(suite.cmd, "go test ./backend/...");
    assert_eq!(suite.env.get("GOFLAGS").map(String::as_str), Some("-count=1"));
    assert!(suite.watch.is_empty());

    let names: Vec<&str> = cfg.test_suite_names().collect();
    assert_eq!(names, vec!["backend", "frontend"]);

    // Suites and commands live in separate namespaces.
    assert!(cfg.command("frontend").is_err());
    Ok(())
}

#[test]
fn unknown_test_suite_lists_available_names() -> TestResult {
    let cfg = sample()?;
    let err = cfg.test_suite("e2e").unwrap_err();

    match &err {
        DevloopError::TestSuiteNotFound { name, available } => {
            assert_eq!(name, "e2e");
            assert_eq!(available, "backend, frontend");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("test suite \"e2e\" not found"), "got {err}");
    Ok(())
}

#[test]
fn config_with_only_test_suites_is_valid() -> TestResult {
    let raw = load_from_str("[tests.unit]\ncmd = \"cargo test\"\n")?;
    let cfg = ConfigFile::try_from(raw)?;
    assert_eq!(cfg.test_suite("unit")?.cmd, "cargo test");
    Ok(())
}

#[test]
fn blank_test_suite_cmd_is_rejected() -> TestResult {
    let raw = load_from_str("[commands.api]\ncmd = \"x\"\n\n[tests.unit]\ncmd = \"\"\n")?;
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(err.to_string().contains("test suite 'unit' has an empty `cmd`"), "got {err}");
    Ok(())
}

#[test]
fn watched_test_suite_is_rejected() -> TestResult {
    let raw = load_from_str("[tests.unit]\ncmd = \"x\"\nwatch = [\"src/\"]\n")?;
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(err.to_string().contains("cannot have `watch`"), "got {err}");
    Ok(())
}

#[test]
fn test_subcommand_selects_a_suite() -> TestResult {
    let cfg = sample()?;

    match select(&cfg, &CliCommand::Test { name: "frontend".into() })? {
        Selection::TestSuite(suite) => assert_eq!(suite.cmd, "yarn test"),
        other => panic!("unexpected selection: {other:?}"),
    }
    match select(&cfg, &CliCommand::Start)? {
        Selection::Commands(commands) => assert_eq!(commands.len(), 2),
        other => panic!("unexpected selection: {other:?}"),
    }

    let err = select(&cfg, &CliCommand::Test { name: "api".into() }).unwrap_err();
    assert!(matches!(err, DevloopError::TestSuiteNotFound { .. }), "got {err:?}");
    Ok(())
}
