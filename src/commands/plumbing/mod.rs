//! Plumbing commands (low-level object access)
//!
//! - `cat_file`: Print a stored object's payload
//! - `hash_object`: Compute a file's blob id and optionally store it

pub mod cat_file;
pub mod hash_object;
