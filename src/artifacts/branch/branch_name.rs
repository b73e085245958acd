use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::artifacts::core::error::UserError;
use anyhow::Context;
use derive_new::new;

pub const HEADS_PREFIX: &str = "refs/heads/";
pub const REMOTES_PREFIX: &str = "refs/remotes/";

/// Path of a ref file relative to the metadata root, as recorded in `HEAD`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn for_branch(branch: &BranchName) -> Self {
        Self(format!("{HEADS_PREFIX}{branch}"))
    }

    /// Remote-tracking ref, `refs/remotes/<remote>/<branch>`
    pub fn for_remote_branch(remote: &str, branch: &BranchName) -> Self {
        Self(format!("{REMOTES_PREFIX}{remote}/{branch}"))
    }

    pub fn is_remote_tracking(&self) -> bool {
        self.0.starts_with(REMOTES_PREFIX)
    }

    pub fn as_ref_path(&self) -> &str {
        &self.0
    }

    /// Branch name shown to users: `master` for local refs, `origin/master` for remote-tracking ones
    pub fn branch_name(&self) -> anyhow::Result<BranchName> {
        let name = self
            .0
            .strip_prefix(HEADS_PREFIX)
            .or_else(|| self.0.strip_prefix(REMOTES_PREFIX))
            .with_context(|| format!("'{}' is not a branch ref", self.0))?;

        BranchName::try_parse(name.to_string())
    }
}

impl std::fmt::Display for SymRefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            return Err(UserError::InvalidBranchName(name).into());
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            Err(UserError::InvalidBranchName(name).into())
        } else {
            Ok(Self(name))
        }
    }

    pub fn is_default_branch(&self) -> bool {
        self.0 == crate::artifacts::branch::DEFAULT_BRANCH
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
