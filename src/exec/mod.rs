// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the commands from the
//! config, using `tokio::process::Command`:
//!
//! - [`shell`] builds the `sh -c` invocation and terminates process groups.
//! - [`install`] runs the install step and captures its combined output.
//! - [`session`] owns one live instance of the run step and its output
//!   readers.
//! - [`output`] drains child pipes into the console sink.
//! - [`supervisor`] is the per-command install → run → reload state machine.
//! - [`test_suite`] runs a test suite once, without watching.

pub mod install;
pub mod output;
pub mod session;
pub mod shell;
pub mod supervisor;
pub mod test_suite;

pub use install::run_install;
pub use session::RunSession;
pub use supervisor::{next_event, CommandSupervisor, SessionEvent};
pub use test_suite::run_test_suite;
