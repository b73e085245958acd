use crate::common::command::{
    commit_file, gitlet_commit, head_commit_id, init_repository_dir, run_gitlet_command,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn commit_advances_the_current_branch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let before = head_commit_id(dir.path())?;

    commit_file(dir.path(), "notwug.txt", "not a wug\n", "added notwug");

    let after = head_commit_id(dir.path())?;
    assert_ne!(before, after);
    assert_eq!(after.len(), 40);

    run_gitlet_command(dir.path(), &["cat-file", &after])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("parent {before}")))
        .stdout(predicate::str::contains("added notwug"));

    Ok(())
}

#[rstest]
fn commit_clears_the_staging_area(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    commit_file(dir.path(), "notwug.txt", "not a wug\n", "added notwug");

    run_gitlet_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Staged Files ===\n\n"))
        .stdout(predicate::str::contains("=== Untracked Files ===\n\n"));

    Ok(())
}

#[rstest]
fn commit_without_changes_is_refused(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    gitlet_commit(init_repository_dir.path(), "nothing new")
        .assert()
        .code(1)
        .stdout("No changes added to the commit.\n");

    Ok(())
}

#[rstest]
#[case(&["commit"])]
#[case(&["commit", ""])]
#[case(&["commit", "   "])]
fn commit_without_message_is_refused(
    init_repository_dir: TempDir,
    #[case] args: &[&str],
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("wug.txt"), "changed\n".to_string()));
    run_gitlet_command(dir.path(), &["add", "wug.txt"]).assert().success();

    run_gitlet_command(dir.path(), args)
        .assert()
        .code(1)
        .stdout("Please enter a commit message.\n");

    Ok(())
}

/// The committed snapshot keeps what the working tree had when it was staged
#[rstest]
fn commit_records_staged_content_not_working_content(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("wug.txt"), "staged\n".to_string()));
    run_gitlet_command(dir.path(), &["add", "wug.txt"]).assert().success();
    write_file(FileSpec::new(dir.path().join("wug.txt"), "unstaged\n".to_string()));

    gitlet_commit(dir.path(), "partial").assert().success();
    run_gitlet_command(dir.path(), &["checkout", "--", "wug.txt"])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(dir.path().join("wug.txt"))?, "staged\n");

    Ok(())
}

#[rstest]
fn commit_message_may_start_with_a_hyphen(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("wug.txt"), "changed\n".to_string()));
    run_gitlet_command(dir.path(), &["add", "wug.txt"]).assert().success();

    gitlet_commit(dir.path(), "-x marks the spot").assert().success();

    run_gitlet_command(dir.path(), &["find", "-x marks the spot"])
        .assert()
        .success()
        .stdout(format!("{}\n", head_commit_id(dir.path())?));

    Ok(())
}

#[rstest]
fn hash_object_prints_the_blob_id(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("loose.txt"), "loose\n".to_string()));

    let output = run_gitlet_command(dir.path(), &["hash-object", "-w", "loose.txt"]).output()?;
    assert!(output.status.success());
    let blob_id = String::from_utf8(output.stdout)?.trim().to_string();
    assert_eq!(blob_id.len(), 40);

    run_gitlet_command(dir.path(), &["cat-file", &blob_id])
        .assert()
        .success()
        .stdout("loose\n");

    Ok(())
}
