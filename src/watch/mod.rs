// src/watch/mod.rs

//! File watching and change routing.
//!
//! This module is responsible for:
//! - Deciding which paths are never interesting ([`filter`]).
//! - Wiring up a cross-platform filesystem watcher (`notify`) that streams
//!   changed paths relative to the project root ([`watcher`]).
//! - Fanning those paths out to the commands whose watch prefixes match,
//!   as coalescing reload signals ([`monitor`]).
//!
//! It does **not** start or stop processes; see [`crate::exec`].

pub mod filter;
pub mod monitor;
pub mod path_utils;
pub mod watcher;

pub use filter::{should_ignore, IGNORE_PATTERNS};
pub use monitor::{ChangeMonitor, ReloadSignal};
pub use watcher::{spawn_watcher, WatcherHandle};
