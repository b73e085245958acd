//! Blob object
//!
//! Blobs store file content. The stored bytes carry no path, but the blob's id
//! does: it is the SHA-1 of the repository-relative path followed by the
//! serialized blob. The same bytes stored under two paths therefore get two ids.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Blob object representing the content of one tracked path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Repository-relative path folded into the id; empty for blobs read back from the store
    path: PathBuf,
    content: Bytes,
}

impl Blob {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Bytes>) -> Self {
        Blob {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Content decoded as text, replacing invalid UTF-8 sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Render a repository-relative path the same way on every platform
pub fn path_key(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        frame(ObjectType::Blob, &self.content)
    }
}

/// Stored bytes carry no path, so a blob read back has an empty path and its
/// [`Object::object_id`] is not the id it was stored under. Rebuild it with
/// [`Blob::new`] and the tracked path to recompute that id.
impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(PathBuf::new(), content))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        self.text()
    }

    fn object_id(&self) -> anyhow::Result<ObjectId> {
        let mut hasher = Sha1::new();
        hasher.update(path_key(&self.path).as_bytes());
        hasher.update(self.serialize()?);

        ObjectId::from_digest(&hasher.finalize())
    }
}
