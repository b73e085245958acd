pub mod object_sync;
pub mod remote;
