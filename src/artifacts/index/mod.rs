//! Staging area data structures
//!
//! The staging area is a full snapshot of tracked paths, expressed with the same
//! [`entry::Entry`] type that trees are built from.

pub mod entry;
