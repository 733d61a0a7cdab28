// src/exec/shell.rs

//! Spawning and terminating shell commands.

use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::debug;

use crate::env::ComposedEnv;

/// Build a shell command appropriate for the platform, running in `root`
/// with exactly the given environment and both output pipes captured.
///
/// On Unix the child leads its own process group so [`terminate`] can take
/// down anything it spawned as well.
pub fn shell_command(script: &str, root: &Path, env: &ComposedEnv) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(script);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(script);
        c
    };

    cmd.current_dir(root)
        .env_clear()
        .envs(env.iter())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    cmd
}

/// Kill `child` (and on Unix its whole process group) and reap it.
pub async fn terminate(child: &mut Child, name: &str) {
    if let Some(pid) = child.id() {
        kill_process_group(pid, name);
    }

    if let Err(err) = child.kill().await {
        debug!(command = %name, error = %err, "failed to kill child process");
    }
}

/// SIGKILL every process left in the group led by `pid`.
///
/// Used after the leader is gone too, so descendants that kept running
/// (and kept the output pipes open) do not outlive their command. A group
/// that no longer exists is not an error.
pub fn kill_process_group(pid: u32, name: &str) {
    #[cfg(unix)]
    {
        use nix::errno::Errno;
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(err) => {
                debug!(command = %name, pid, error = %err, "failed to signal process group");
            }
        }
    }

    #[cfg(not(unix))]
    let _ = (pid, name);
}
