// src/engine/mod.rs

//! Orchestration of a group of supervised commands.
//!
//! The flow is:
//!
//! ```text
//! watcher --paths--> ChangeMonitor --reload signal--> CommandSupervisor (one per command)
//!                                                         |
//!                          GroupCoordinator <--outcome----+
//! ```
//!
//! [`GroupCoordinator`] owns the shared cancellation scope and decides which
//! error, if any, is reported to the caller.

pub mod coordinator;

pub use coordinator::GroupCoordinator;
