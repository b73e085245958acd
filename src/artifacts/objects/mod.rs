//! Stored object types
//!
//! Everything in the object store is one of three object types, identified by
//! the SHA-1 hash of its serialized form:
//!
//! - **Blob**: file content (raw bytes), hashed together with its path
//! - **Tree**: one full snapshot of tracked paths
//! - **Commit**: a timestamped, named tree with up to two parent links
//!
//! All objects share the `<type> <size>\0<content>` format.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated id used by log records
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
