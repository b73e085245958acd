//! Working tree status inspection
//!
//! Compares the working tree against the index, and the index against the
//! HEAD commit's tree.
//!
//! ## Components
//!
//! - `file_change`: Labels for unstaged workspace changes
//! - `status_info`: Status collection and the sectioned report

pub mod file_change;
pub mod status_info;
