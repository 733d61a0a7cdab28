use std::fmt;

/// Canonical command name type used throughout the crate.
pub type CommandName = String;

/// Lifecycle state of a single supervised command.
///
/// ```text
/// Installing -> Running -> Reloading -> Installing -> ...
///                       \-> Exited
/// Installing -> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Installing,
    Running,
    Reloading,
    Exited,
    Failed,
}

impl SupervisorState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SupervisorState::Exited | SupervisorState::Failed)
    }
}

/// Which pipe of a child process a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStream::Stdout => f.write_str("stdout"),
            OutputStream::Stderr => f.write_str("stderr"),
        }
    }
}
