//! Rewriting the working tree to match another tree
//!
//! Checkout, reset and merge all move the working tree from the current
//! commit's tree to a target tree. The plan is computed first and checked for
//! untracked files in the way, so a refused operation touches nothing.

pub mod conflict;
pub mod migration;
