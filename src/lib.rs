//! A miniature content-addressed version-control system
//!
//! - `areas`: on-disk stores and the [`areas::repository::Repository`] handle
//! - `artifacts`: object types and the algorithms over them
//! - `commands`: one `Repository` method per command

pub mod areas;
pub mod artifacts;
pub mod commands;
