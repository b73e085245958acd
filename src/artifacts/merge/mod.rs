//! Three-way merge
//!
//! - `ancestor`: split-point discovery between two branch heads
//! - `resolution`: per-path reconciliation of ancestor, current and given trees
//! - `line_merge`: line-level merge of two texts with conflict markers

pub mod ancestor;
pub mod line_merge;
pub mod resolution;
