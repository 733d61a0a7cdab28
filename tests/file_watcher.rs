mod common;
use crate::common::{init_tracing, with_timeout, Project};

use std::error::Error;
use std::time::Duration;

use devloop::errors::DevloopError;
use devloop::watch::spawn_watcher;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn reports_changes_relative_to_root_and_skips_ignored_paths() -> TestResult {
    init_tracing();
    let project = Project::new();
    std::fs::create_dir_all(project.path("node_modules/pkg"))?;
    std::fs::create_dir_all(project.path("backend"))?;

    let (handle, mut paths) = spawn_watcher(project.root())?;
    assert_eq!(handle.root(), &project.root());

    project.write("node_modules/pkg/index.js", "ignored");
    project.write(".git/HEAD", "ref: refs/heads/main");
    project.write("backend/server_test.go", "package backend");
    project.write("backend/server.go", "package backend");

    let mut seen = Vec::new();
    with_timeout(async {
        while let Some(path) = paths.recv().await {
            let done = path == "backend/server.go";
            seen.push(path);
            if done {
                break;
            }
        }
    })
    .await;

    for path in &seen {
        assert!(!path.starts_with("node_modules/"), "leaked {path}");
        assert!(!path.starts_with(".git/"), "leaked {path}");
        assert!(!path.ends_with("_test.go"), "leaked {path}");
    }
    Ok(())
}

#[tokio::test]
async fn dropping_the_handle_ends_the_stream() -> TestResult {
    let project = Project::new();
    let (handle, mut paths) = spawn_watcher(project.root())?;
    drop(handle);

    let end = tokio::time::timeout(Duration::from_secs(5), async {
        while paths.recv().await.is_some() {}
    })
    .await;
    assert!(end.is_ok(), "path stream did not close");
    Ok(())
}

#[tokio::test]
async fn missing_root_fails_to_register() {
    let err = spawn_watcher("/no/such/devloop/root").unwrap_err();
    assert!(matches!(err, DevloopError::Watch(_)), "got {err:?}");
}
