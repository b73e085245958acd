//! Commit history
//!
//! - `commit_walk`: lazy traversal of the primary-parent chain
//! - `log_record`: the line format of the append-only history log files

pub mod commit_walk;
pub mod log_record;
