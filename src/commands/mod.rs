//! Command implementations
//!
//! Each command is an `impl Repository` block in its own file, split into two
//! categories:
//!
//! - `plumbing`: Low-level commands for direct object access (cat-file, hash-object)
//! - `porcelain`: User-facing commands for version control workflows (add, commit, merge, push, ...)

pub mod plumbing;
pub mod porcelain;
