//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`, `rm`: Stage files for commit or for removal
//! - `commit`: Record the staged snapshot
//! - `status`: Show branches and working tree status
//! - `log`, `global_log`, `find`: Read history
//! - `branch`, `rm_branch`: Create or delete branches
//! - `checkout`, `reset`: Move the working tree to another commit
//! - `merge`: Three-way merge of another branch into the current one
//! - `add_remote`, `rm_remote`, `push`, `fetch`, `pull`: Synchronize with other repositories

pub mod add;
pub mod add_remote;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod fetch;
pub mod find;
pub mod global_log;
pub mod init;
pub mod log;
pub mod merge;
pub mod pull;
pub mod push;
pub mod reset;
pub mod rm;
pub mod rm_branch;
pub mod rm_remote;
pub mod status;
