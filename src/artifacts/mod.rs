//! Version-control data structures and algorithms
//!
//! - `branch`: Branch and reference names
//! - `checkout`: Working tree migration planning and safety checks
//! - `core`: Error taxonomy
//! - `index`: Staging entries
//! - `log`: History log records and commit walks
//! - `merge`: Split-point discovery and three-way merge
//! - `objects`: Stored object types (blob, tree, commit)
//! - `remote`: Remote definitions and object transfer
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod remote;
pub mod status;
