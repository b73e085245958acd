//! Core repository components
//!
//! This module contains the on-disk areas of a repository:
//!
//! - `config`: Repository configuration (remotes)
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Staging area tracking the next commit's snapshot
//! - `logs`: Append-only history log files
//! - `refs`: Reference management (branches, remote-tracking branches, HEAD)
//! - `repository`: High-level repository operations and coordination
//! - `workspace`: Working directory file system operations

pub mod config;
pub mod database;
pub mod index;
pub mod logs;
pub mod refs;
pub mod repository;
pub mod workspace;
