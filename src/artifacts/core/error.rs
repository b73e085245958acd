//! Error taxonomy
//!
//! Two kinds of failure leave the core:
//!
//! - [`UserError`]: an expected, user-facing refusal. Carries the exact message the
//!   driver prints and is raised before any mutation wherever possible.
//! - Everything else travels as `anyhow::Error` with context attached. Malformed
//!   stored objects are tagged with [`ObjectError`] so callers can tell them apart.
//!
//! Absence (unknown object, missing branch) is not an error at all: lookups return
//! `Option` and the caller decides whether a `None` becomes a [`UserError`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("Please enter a command.")]
    NoCommand,
    #[error("No command with that name exists.")]
    UnknownCommand,
    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,
    #[error("Incorrect operands.")]
    IncorrectOperands,
    #[error("File does not exist.")]
    FileNotFound,
    #[error("Please enter a commit message.")]
    EmptyCommitMessage,
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("No reason to remove the file.")]
    NoReasonToRemove,
    #[error("Found no commit with that message.")]
    NoCommitWithMessage,
    #[error("No commit with that id exists.")]
    NoSuchCommit,
    #[error("Ambiguous commit id {0}.")]
    AmbiguousCommitId(String),
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("No such branch exists.")]
    NoSuchBranch,
    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,
    #[error("A branch with that name already exists.")]
    BranchAlreadyExists,
    #[error("A branch with that name does not exist.")]
    BranchNotFound,
    #[error("Invalid branch name {0}.")]
    InvalidBranchName(String),
    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay,
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Cannot merge a branch with itself.")]
    MergeWithItself,
    #[error("Given branch is an ancestor of the current branch.")]
    GivenBranchIsAncestor,
    #[error("A remote with that name already exists.")]
    RemoteAlreadyExists,
    #[error("A remote with that name does not exist.")]
    RemoteNotFound,
    #[error("Remote directory not found.")]
    RemoteDirectoryNotFound,
    #[error("That remote does not have that branch.")]
    RemoteBranchNotFound,
    #[error("Please pull down remote changes before pushing.")]
    PullBeforePushing,
}

/// Malformed content found in the object store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    #[error("object {oid} is malformed: {reason}")]
    Malformed { oid: String, reason: String },
}

/// Returns the [`UserError`] at the root of an error chain, if there is one
pub fn user_error(error: &anyhow::Error) -> Option<&UserError> {
    error.downcast_ref::<UserError>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_survives_context() {
        let error = anyhow::Error::from(UserError::NoSuchBranch).context("while checking out");

        assert_eq!(user_error(&error), Some(&UserError::NoSuchBranch));
    }

    #[test]
    fn internal_errors_are_not_user_errors() {
        let error = anyhow::anyhow!("disk on fire");

        assert_eq!(user_error(&error), None);
    }
}
