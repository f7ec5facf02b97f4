//! Remote store interface.
//!
//! The store holds folders and files addressed by opaque handles. The only
//! primitives the core relies on are listing the children of a folder handle
//! and creating a folder or a file under one. Every call is a blocking round
//! trip.
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`]: an in-process tree used by tests and fixtures
//! - [`LocalDirStore`]: a tree mapped onto a local directory

mod local;
mod memory;

use std::fmt;
use std::io::Read;

use chrono::{DateTime, Utc};

use crate::Result;

pub use local::LocalDirStore;
pub use memory::{MemoryStore, StoreStats};

/// Top-level roots exposed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    /// Folder scoped to the application, hidden from the user.
    AppPrivate,
    /// The user-visible drive root. The documents folder lives under it.
    Documents,
}

impl RootKind {
    /// Map the host's `useDocumentsFolder` flag to a root kind.
    pub fn from_documents_flag(use_documents_root: bool) -> Self {
        if use_documents_root {
            RootKind::Documents
        } else {
            RootKind::AppPrivate
        }
    }
}

/// Opaque reference to a folder node in the remote tree.
///
/// Handles come from the store only: as a root, from a listed child that is a
/// folder, or as the result of a create call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderHandle {
    id: String,
}

impl FolderHandle {
    /// Wrap a store identifier. For store implementations.
    pub fn from_remote(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The store's identifier for this folder.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for FolderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Reference to a file created in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    id: String,
    name: String,
}

impl FileHandle {
    /// Wrap a store identifier and the title the file was created with.
    pub fn from_remote(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The store's identifier for this file.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The title the file was created with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One child record returned by a folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Title of the child. Not unique among siblings.
    pub name: String,
    /// Whether the child is a folder.
    pub is_folder: bool,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Size in bytes.
    pub size: u64,
    /// Stable store identifier.
    pub id: String,
    /// False when the store has not populated size/time yet.
    pub data_valid: bool,
}

impl Entry {
    /// The folder handle for this child, if it is a folder.
    pub fn folder_handle(&self) -> Option<FolderHandle> {
        self.is_folder.then(|| FolderHandle::from_remote(self.id.clone()))
    }
}

/// Children of a folder, as returned by one listing call.
///
/// The store may attach a release action to the buffer. It runs exactly once,
/// when the listing is dropped, so every exit path out of a scan releases it.
pub struct ChildListing {
    entries: Vec<Entry>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ChildListing {
    /// A listing with nothing to release.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            release: None,
        }
    }

    /// A listing whose buffer must be released by calling `release`.
    pub fn with_release(entries: Vec<Entry>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            entries,
            release: Some(Box::new(release)),
        }
    }

    /// Iterate over the children in the store's order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the folder has no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChildListing {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Drop for ChildListing {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ChildListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildListing")
            .field("entries", &self.entries)
            .field("releasable", &self.release.is_some())
            .finish()
    }
}

/// The remote tree-structured object store.
///
/// Failures are reported as [`CloudFsError::Remote`](crate::CloudFsError::Remote)
/// carrying the store's status unchanged, or as
/// [`CloudFsError::Transport`](crate::CloudFsError::Transport) when upload bytes
/// could not be copied.
pub trait RemoteStore: Send + Sync {
    /// Handle for one of the store's roots.
    fn root(&self, kind: RootKind) -> Result<FolderHandle>;

    /// List the immediate children of a folder.
    fn list_children(&self, folder: &FolderHandle) -> Result<ChildListing>;

    /// Create a folder under `parent`. Does not check for existing siblings.
    fn create_folder(&self, parent: &FolderHandle, name: &str) -> Result<FolderHandle>;

    /// Create a file under `parent`, streaming its content from `content`.
    fn create_file(
        &self,
        parent: &FolderHandle,
        name: &str,
        mime_type: Option<&str>,
        content: &mut dyn Read,
    ) -> Result<FileHandle>;
}

impl<S: RemoteStore + ?Sized> RemoteStore for &S {
    fn root(&self, kind: RootKind) -> Result<FolderHandle> {
        (**self).root(kind)
    }

    fn list_children(&self, folder: &FolderHandle) -> Result<ChildListing> {
        (**self).list_children(folder)
    }

    fn create_folder(&self, parent: &FolderHandle, name: &str) -> Result<FolderHandle> {
        (**self).create_folder(parent, name)
    }

    fn create_file(
        &self,
        parent: &FolderHandle,
        name: &str,
        mime_type: Option<&str>,
        content: &mut dyn Read,
    ) -> Result<FileHandle> {
        (**self).create_file(parent, name, mime_type, content)
    }
}

impl<S: RemoteStore + ?Sized> RemoteStore for std::sync::Arc<S> {
    fn root(&self, kind: RootKind) -> Result<FolderHandle> {
        (**self).root(kind)
    }

    fn list_children(&self, folder: &FolderHandle) -> Result<ChildListing> {
        (**self).list_children(folder)
    }

    fn create_folder(&self, parent: &FolderHandle, name: &str) -> Result<FolderHandle> {
        (**self).create_folder(parent, name)
    }

    fn create_file(
        &self,
        parent: &FolderHandle,
        name: &str,
        mime_type: Option<&str>,
        content: &mut dyn Read,
    ) -> Result<FileHandle> {
        (**self).create_file(parent, name, mime_type, content)
    }
}
