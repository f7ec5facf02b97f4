//! Host-facing façade.
//!
//! [`CloudFs`] is what a host bridge talks to: it takes raw path strings and a
//! root selector, and runs the navigation, creation and listing operations
//! against one remote store.

use std::io::Read;

use tracing::info;

use crate::config::Config;
use crate::listing::{self, DirectoryListing};
use crate::naming::allocate;
use crate::navigate::{ensure_path, navigate};
use crate::path::{resolve, PathSegments};
use crate::remote::{FileHandle, FolderHandle, RemoteStore, RootKind};
use crate::roots::RootResolver;
use crate::{exists, CloudFsError, Result};

/// Path operations over a remote store.
#[derive(Debug)]
pub struct CloudFs<S> {
    store: S,
    roots: RootResolver,
    timezone: String,
}

impl<S: RemoteStore> CloudFs<S> {
    /// Create a service whose documents folder is titled `app_name`.
    pub fn new(store: S, app_name: impl Into<String>) -> Self {
        Self {
            store,
            roots: RootResolver::new(app_name),
            timezone: "UTC".to_string(),
        }
    }

    /// Create a service from loaded configuration.
    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store, config.store.app_name.clone()).with_timezone(&config.display.timezone)
    }

    /// Set the timezone listings format `lastModified` in.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Title of the documents folder.
    pub fn app_name(&self) -> &str {
        self.roots.app_name()
    }

    /// Normalize a raw path string.
    pub fn resolve_path(&self, raw: &str) -> PathSegments {
        resolve(raw)
    }

    /// Folder handle for a root selector.
    pub fn root_folder(&self, use_documents_root: bool) -> Result<FolderHandle> {
        self.roots
            .resolve(&self.store, RootKind::from_documents_flag(use_documents_root))
    }

    /// Resolve `path` to an existing folder.
    ///
    /// Fails with [`CloudFsError::NotFound`] naming the first missing segment.
    pub fn folder_at(&self, use_documents_root: bool, path: &str) -> Result<FolderHandle> {
        let root = self.root_folder(use_documents_root)?;
        navigate(&self.store, &root, &resolve(path))?.into_result()
    }

    /// Resolve `path` to a folder, creating any missing folder along the way.
    pub fn ensure_folder(&self, use_documents_root: bool, path: &str) -> Result<FolderHandle> {
        let root = self.root_folder(use_documents_root)?;
        ensure_path(&self.store, &root, &resolve(path))
    }

    /// Whether `path` names an existing file or folder.
    ///
    /// A missing parent folder answers `false`; store failures are errors.
    pub fn file_exists(&self, use_documents_root: bool, path: &str) -> Result<bool> {
        let root = self.root_folder(use_documents_root)?;
        exists::exists_at_path(&self.store, &root, &resolve(path))
    }

    /// Upload `content` into `folder` under a name no child currently uses.
    ///
    /// The returned handle carries the name actually used.
    pub fn create_unique_file(
        &self,
        folder: &FolderHandle,
        desired_name: &str,
        mime_type: Option<&str>,
        mut content: impl Read,
    ) -> Result<FileHandle> {
        let name = allocate(&self.store, folder, desired_name)?;
        let file = self
            .store
            .create_file(folder, &name, mime_type, &mut content)?;
        info!(name = %file.name(), id = %file.id(), "Created a file");
        Ok(file)
    }

    /// Upload to `path`: parent folders are created, the leaf is the desired name.
    pub fn upload(
        &self,
        use_documents_root: bool,
        path: &str,
        mime_type: Option<&str>,
        content: impl Read,
    ) -> Result<FileHandle> {
        let segments = resolve(path);
        let (parents, name) = segments
            .split_leaf()
            .ok_or_else(|| CloudFsError::InvalidPath(format!("{path:?} has no file name")))?;
        let root = self.root_folder(use_documents_root)?;
        let folder = ensure_path(&self.store, &root, parents)?;
        self.create_unique_file(&folder, name, mime_type, content)
    }

    /// List the folder at `path`.
    pub fn list_directory(&self, use_documents_root: bool, path: &str) -> Result<DirectoryListing> {
        let root = self.root_folder(use_documents_root)?;
        listing::list(&self.store, &root, &resolve(path), &self.timezone)
    }
}
