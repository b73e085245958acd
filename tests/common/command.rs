use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// Fixed commit clock so ids and dates are reproducible
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with `wug.txt` committed on master
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("wug.txt"),
        "This is a wug.\n".to_string(),
    ));
    run_gitlet_command(repository_dir.path(), &["add", "wug.txt"])
        .assert()
        .success();
    gitlet_commit(repository_dir.path(), "added wug")
        .assert()
        .success();

    repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.envs(vec![("GITLET_LOG", "off")]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitlet_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_gitlet_command(dir, &["commit", message]);
    cmd.env("GITLET_COMMIT_DATE", COMMIT_DATE);
    cmd
}

/// Write, stage and commit one file
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(file), content.to_string()));
    run_gitlet_command(dir, &["add", file]).assert().success();
    gitlet_commit(dir, message).assert().success();
}

/// Commit id the current branch points at
pub fn head_commit_id(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head = std::fs::read_to_string(dir.join(".gitlet").join("HEAD"))?;
    let commit_id = std::fs::read_to_string(dir.join(".gitlet").join(head.trim()))?;

    Ok(commit_id.trim().to_string())
}

/// Commit id a branch points at
pub fn branch_commit_id(dir: &Path, branch: &str) -> Result<String, Box<dyn std::error::Error>> {
    let commit_id =
        std::fs::read_to_string(dir.join(".gitlet").join("refs").join("heads").join(branch))?;

    Ok(commit_id.trim().to_string())
}
