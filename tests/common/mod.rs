#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

// Not every test binary uses every helper.
#[allow(unused_imports)]
pub use devloop_test_utils::builders;
#[allow(unused_imports)]
pub use devloop_test_utils::{init_tracing, with_timeout, MemorySink};

/// A throwaway project tree: a temp directory with a `.git` marker.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp project dir");
        fs::create_dir(dir.path().join(".git")).expect("create .git marker");
        Self { dir }
    }

    /// Canonical root, so it compares equal to what the crate resolves.
    pub fn root(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("canonical project root")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write project file");
        path
    }

    pub fn read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.path(rel)).ok()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }
}

/// Whether `pid` is a live process. Zombies count as dead.
#[cfg(unix)]
pub fn process_alive(pid: i32) -> bool {
    if let Ok(stat) = fs::read_to_string(format!("/proc/{pid}/stat")) {
        // The state field follows the parenthesised command name.
        let state = stat
            .rsplit(')')
            .next()
            .and_then(|rest| rest.split_whitespace().next());
        return state != Some("Z");
    }
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid), None).is_ok()
}

/// Poll until `pid` is gone. Panics after 5 seconds.
#[cfg(unix)]
pub async fn wait_until_dead(pid: i32) {
    for _ in 0..500 {
        if !process_alive(pid) {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("process {pid} is still alive");
}

/// Read a pid written by a test command, waiting for the file to appear.
pub async fn read_pid(project: &Project, rel: &str) -> i32 {
    for _ in 0..500 {
        if let Some(pid) = project
            .read(rel)
            .and_then(|s| s.trim().parse::<i32>().ok())
        {
            return pid;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("no pid written to {rel}");
}
