use crate::areas::config::Config;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::logs::Logs;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::UserError;
use crate::artifacts::log::log_record::LogRecord;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::commit::{Commit, commit_timestamp};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::remote::remote::METADATA_DIR;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shortest abbreviated commit id accepted on the command line
pub const MIN_SHORT_ID_LENGTH: usize = 6;

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    logs: Logs,
    config: Config,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path)
            .canonicalize()
            .with_context(|| format!("failed to resolve repository path {path}"))?;

        let metadata_root = metadata_root(&path);

        Ok(Self::at_root(path, metadata_root, writer))
    }

    /// Open the repository whose metadata root is `metadata_root`
    ///
    /// Used to address a remote, whose work tree is the metadata root's parent.
    pub fn open_metadata_root(
        metadata_root: &Path,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let metadata_root = metadata_root
            .canonicalize()
            .with_context(|| format!("failed to resolve metadata root {metadata_root:?}"))?;
        let work_tree = metadata_root
            .parent()
            .with_context(|| format!("metadata root {metadata_root:?} has no parent"))?
            .to_path_buf();

        Ok(Self::at_root(work_tree, metadata_root, writer))
    }

    fn at_root(path: PathBuf, metadata_root: PathBuf, writer: Box<dyn std::io::Write>) -> Self {
        let index = Index::new(metadata_root.join("index").into_boxed_path());
        let database = Database::new(metadata_root.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_root.clone().into_boxed_path());
        let logs = Logs::new(metadata_root.join("logs").into_boxed_path());
        let config = Config::new(metadata_root.join("config").into_boxed_path());

        Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
            logs,
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata root (`.gitlet`)
    pub fn gitlet_path(&self) -> PathBuf {
        metadata_root(&self.path)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn logs(&self) -> &Logs {
        &self.logs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.gitlet_path().is_dir()
    }

    pub fn require_initialized(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(UserError::NotInitialized.into());
        }

        Ok(())
    }

    /// Id and content of the checked-out commit
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head_oid = self
            .refs
            .read_head()?
            .context("HEAD does not point at a commit")?;
        let commit = self.database.load_commit(&head_oid)?;

        Ok((head_oid, commit))
    }

    pub fn head_tree(&self) -> anyhow::Result<Tree> {
        let (_, commit) = self.head_commit()?;
        self.database.load_commit_tree(&commit)
    }

    pub fn commit_tree(&self, commit_id: &ObjectId) -> anyhow::Result<Tree> {
        let commit = self.database.load_commit(commit_id)?;
        self.database.load_commit_tree(&commit)
    }

    /// Resolve a full or abbreviated commit id
    ///
    /// Abbreviations must be at least six characters and match exactly one
    /// object, which must be a commit.
    pub fn resolve_commit_id(&self, commit_id: &str) -> anyhow::Result<ObjectId> {
        if commit_id.len() < MIN_SHORT_ID_LENGTH {
            return Err(UserError::IncorrectOperands.into());
        }

        let oid = if commit_id.len() == OBJECT_ID_LENGTH {
            ObjectId::try_parse(commit_id.to_string()).map_err(|_| UserError::NoSuchCommit)?
        } else {
            let mut matches = self.database.find_objects_by_prefix(commit_id)?;
            match matches.len() {
                0 => return Err(UserError::NoSuchCommit.into()),
                1 => matches.remove(0),
                _ => return Err(UserError::AmbiguousCommitId(commit_id.to_string()).into()),
            }
        };

        match self.database.parse_object_as_commit(&oid)? {
            Some(_) => Ok(oid),
            None => Err(UserError::NoSuchCommit.into()),
        }
    }

    /// Open a configured remote's repository
    ///
    /// An unknown remote name and a missing metadata root both fail with
    /// [`UserError::RemoteDirectoryNotFound`].
    pub fn open_remote(&self, name: &str) -> anyhow::Result<Repository> {
        let remote = self
            .config
            .find_remote(name)?
            .ok_or(UserError::RemoteDirectoryNotFound)?;
        let root = remote.resolve_root(&self.path);

        if !root.is_dir() {
            return Err(UserError::RemoteDirectoryNotFound.into());
        }

        Repository::open_metadata_root(&root, Box::new(std::io::sink()))
    }

    /// A reference-only history record stamped with the commit clock
    pub fn reference_record(
        &self,
        previous: Option<&ObjectId>,
        target: &ObjectId,
        message: &str,
    ) -> LogRecord {
        LogRecord::for_reference(previous, target, commit_timestamp(), message)
    }
}

fn metadata_root(work_tree: &Path) -> PathBuf {
    work_tree.join(METADATA_DIR)
}
