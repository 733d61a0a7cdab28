// src/lib.rs

pub mod cli;
pub mod config;
pub mod console;
pub mod engine;
pub mod env;
pub mod errors;
pub mod exec;
pub mod interrupt;
pub mod logging;
pub mod root;
pub mod types;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::{CliArgs, CliCommand};
use crate::config::loader::load_and_validate;
use crate::config::{Command, ConfigFile};
use crate::console::Console;
use crate::engine::GroupCoordinator;
use crate::exec::run_test_suite;
use crate::interrupt::spawn_interrupt_handler;
use crate::root::{explicit_project_root, resolve_project_root};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and command selection (usage errors surface here,
///   before anything runs)
/// - project root resolution
/// - the group coordinator (watcher, change monitor, supervisors)
/// - the one-shot test suite runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;
    let selection = select(&cfg, &args.command)?;

    let root = match args.root.as_deref() {
        Some(dir) => explicit_project_root(Path::new(dir))?,
        None => resolve_project_root(&std::env::current_dir()?)?,
    };

    if args.dry_run {
        print_dry_run(&cfg, &root, &selection);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let _interrupts = spawn_interrupt_handler(cancel.clone());

    match selection {
        Selection::Commands(commands) => {
            let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
            info!(?names, root = %root.display(), "starting commands");

            let coordinator = GroupCoordinator::new(
                commands,
                root,
                cfg.global_env().clone(),
                Arc::new(Console),
            );
            coordinator.run(cancel).await?;
            debug!("all commands stopped");
        }
        Selection::TestSuite(suite) => {
            info!(suite = %suite.name, root = %root.display(), "running test suite");
            run_test_suite(&suite, &root, cfg.global_env(), Arc::new(Console), &cancel)
                .await
                .map_err(|err| err.in_command(suite.name.clone()))?;
        }
    }

    Ok(())
}

/// What a subcommand asks to run.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Commands supervised together until the first one finishes.
    Commands(Vec<Arc<Command>>),
    /// A test suite, run once.
    TestSuite(Arc<Command>),
}

/// Resolve what a subcommand refers to.
pub fn select(cfg: &ConfigFile, command: &CliCommand) -> errors::Result<Selection> {
    match command {
        CliCommand::Test { name } => Ok(Selection::TestSuite(cfg.test_suite(name)?)),
        other => select_commands(cfg, other).map(Selection::Commands),
    }
}

/// Resolve the commands a supervising subcommand refers to.
///
/// `test` is not a supervising subcommand; see [`select`].
pub fn select_commands(
    cfg: &ConfigFile,
    command: &CliCommand,
) -> errors::Result<Vec<Arc<Command>>> {
    match command {
        CliCommand::Run { name } => Ok(vec![cfg.command(name)?]),
        CliCommand::Test { name } => Err(errors::DevloopError::ConfigError(format!(
            "{name:?} is a test suite; use `devloop test {name}`"
        ))),
        other => {
            let set = other.command_set().unwrap_or(cli::DEFAULT_COMMAND_SET);
            cfg.command_set(set)
        }
    }
}

/// Print what would be run, without running it.
fn print_dry_run(cfg: &ConfigFile, root: &Path, selection: &Selection) {
    println!("devloop dry-run");
    println!("  root = {}", root.display());
    if !cfg.global_env().is_empty() {
        println!("  env: {:?}", cfg.global_env());
    }
    println!();

    match selection {
        Selection::Commands(commands) => {
            println!("commands ({}):", commands.len());
            for command in commands {
                print_command(command);
            }
        }
        Selection::TestSuite(suite) => {
            println!("test suite:");
            print_command(suite);
        }
    }

    debug!("dry-run complete (no execution)");
}

fn print_command(command: &Command) {
    println!("  - {}", command.name);
    if command.has_install() {
        println!("      install: {}", command.install);
    }
    println!("      cmd: {}", command.cmd);
    if !command.env.is_empty() {
        println!("      env: {:?}", command.env);
    }
    if !command.watch.is_empty() {
        println!("      watch: {:?}", command.watch);
    }
}
