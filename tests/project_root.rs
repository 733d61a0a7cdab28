mod common;
use crate::common::Project;

use std::error::Error;
use std::fs;

use devloop::errors::DevloopError;
use devloop::root::{explicit_project_root, resolve_project_root};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn resolves_from_the_root_itself() -> TestResult {
    let project = Project::new();
    assert_eq!(resolve_project_root(&project.root())?, project.root());
    Ok(())
}

#[test]
fn resolves_from_a_nested_directory() -> TestResult {
    let project = Project::new();
    let nested = project.path("client/web/src");
    fs::create_dir_all(&nested)?;

    assert_eq!(resolve_project_root(&nested)?, project.root());
    Ok(())
}

#[test]
fn git_file_marks_a_worktree_root() -> TestResult {
    let outer = Project::new();
    let worktree = outer.path("worktrees/feature");
    fs::create_dir_all(&worktree)?;
    fs::write(worktree.join(".git"), "gitdir: ../../.git/worktrees/feature\n")?;

    assert_eq!(resolve_project_root(&worktree)?, worktree);
    Ok(())
}

#[test]
fn directory_outside_any_project_is_an_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    match resolve_project_root(dir.path()) {
        Err(DevloopError::ProjectRoot(msg)) => assert!(msg.contains(".git"), "got {msg}"),
        // Some CI sandboxes put the temp dir inside a checkout.
        Ok(root) => assert!(root.join(".git").exists()),
        Err(other) => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_start_directory_is_an_error() {
    let err = resolve_project_root("/no/such/dir/for/devloop".as_ref()).unwrap_err();
    assert!(matches!(err, DevloopError::ProjectRoot(_)), "got {err:?}");
}

#[test]
fn explicit_root_skips_discovery() -> TestResult {
    let dir = tempfile::tempdir()?;
    assert_eq!(explicit_project_root(dir.path())?, dir.path().canonicalize()?);
    Ok(())
}

#[test]
fn explicit_root_must_be_a_directory() -> TestResult {
    let file = tempfile::NamedTempFile::new()?;
    let err = explicit_project_root(file.path()).unwrap_err();
    assert!(err.to_string().contains("is not a directory"), "got {err}");
    Ok(())
}
