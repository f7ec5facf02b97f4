//! Remote store backed by a local directory.
//!
//! Layout under the base path:
//! ```text
//! {base_path}/
//! ├── appdata/   <- app-private root
//! └── drive/     <- user-visible root, holds the documents folder
//! ```
//!
//! Handles are paths relative to the base directory and must resolve, after
//! following symlinks, to a directory inside it. Symlinks are listed as plain
//! entries, never as folders. A local directory cannot
//! hold two siblings with the same name, so creating an existing name is
//! reported as a conflict status instead of producing a duplicate.

use std::fs::{self, OpenOptions};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{ChildListing, Entry, FileHandle, FolderHandle, RemoteStore, RootKind};
use crate::error::RemoteStatus;
use crate::{CloudFsError, Result};

const APP_DIR: &str = "appdata";
const DRIVE_DIR: &str = "drive";

const STATUS_BAD_REQUEST: i32 = 400;
const STATUS_NOT_FOUND: i32 = 404;
const STATUS_CONFLICT: i32 = 409;

/// Remote store that maps the tree onto a local directory.
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    base_path: PathBuf,
    canonical_base: PathBuf,
}

impl LocalDirStore {
    /// Open a store at `base_path`, creating both root directories.
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(base_path.join(APP_DIR))?;
        fs::create_dir_all(base_path.join(DRIVE_DIR))?;
        let canonical_base = fs::canonicalize(&base_path)?;
        Ok(Self {
            base_path,
            canonical_base,
        })
    }

    /// Base directory of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Local path of a handle id, rejecting ids that escape the base path.
    fn resolve_id(&self, id: &str) -> Result<PathBuf> {
        let relative = Path::new(id);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if id.is_empty() || escapes {
            return Err(remote(STATUS_BAD_REQUEST, format!("invalid handle: {id}")));
        }
        Ok(self.base_path.join(relative))
    }

    fn folder_path(&self, folder: &FolderHandle) -> Result<PathBuf> {
        let path = self.resolve_id(folder.id())?;
        let canonical = match fs::canonicalize(&path) {
            Ok(canonical) if canonical.is_dir() => canonical,
            _ => {
                return Err(remote(
                    STATUS_NOT_FOUND,
                    format!("no folder with id {}", folder.id()),
                ))
            }
        };
        if !canonical.starts_with(&self.canonical_base) {
            return Err(remote(
                STATUS_BAD_REQUEST,
                format!("handle leaves the store: {}", folder.id()),
            ));
        }
        Ok(canonical)
    }

    fn child_id(parent: &FolderHandle, name: &str) -> String {
        format!("{}/{}", parent.id(), name)
    }
}

fn remote(code: i32, message: impl Into<String>) -> CloudFsError {
    CloudFsError::Remote(RemoteStatus::new(code, message))
}

fn status_from_io(e: &io::Error, what: &str) -> CloudFsError {
    let code = match e.kind() {
        io::ErrorKind::NotFound => STATUS_NOT_FOUND,
        io::ErrorKind::AlreadyExists => STATUS_CONFLICT,
        _ => 500,
    };
    remote(code, format!("{what}: {e}"))
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\0')
    {
        return Err(remote(STATUS_BAD_REQUEST, format!("invalid name: {name:?}")));
    }
    Ok(())
}

impl RemoteStore for LocalDirStore {
    fn root(&self, kind: RootKind) -> Result<FolderHandle> {
        let id = match kind {
            RootKind::AppPrivate => APP_DIR,
            RootKind::Documents => DRIVE_DIR,
        };
        Ok(FolderHandle::from_remote(id))
    }

    fn list_children(&self, folder: &FolderHandle) -> Result<ChildListing> {
        let path = self.folder_path(folder)?;
        let read_dir = fs::read_dir(&path).map_err(|e| status_from_io(&e, "list failed"))?;

        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|e| status_from_io(&e, "list failed"))?;
            let (name, utf8_name) = match dir_entry.file_name().into_string() {
                Ok(name) => (name, true),
                Err(raw) => (raw.to_string_lossy().into_owned(), false),
            };
            let id = Self::child_id(folder, &name);

            // Entry metadata does not follow symlinks, so a link is never a folder.
            let entry = match dir_entry.metadata() {
                Ok(metadata) if utf8_name => Entry {
                    name,
                    is_folder: metadata.is_dir(),
                    modified: metadata
                        .modified()
                        .map(DateTime::<Utc>::from)
                        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                    size: if metadata.is_dir() { 0 } else { metadata.len() },
                    id,
                    data_valid: true,
                },
                _ => Entry {
                    is_folder: false,
                    name,
                    modified: DateTime::<Utc>::UNIX_EPOCH,
                    size: 0,
                    id,
                    data_valid: false,
                },
            };
            entries.push(entry);
        }

        // read_dir order is unspecified; the store's contract is a stable order.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(folder = %folder, count = entries.len(), "Listed local folder");

        Ok(ChildListing::new(entries))
    }

    fn create_folder(&self, parent: &FolderHandle, name: &str) -> Result<FolderHandle> {
        validate_name(name)?;
        let path = self.folder_path(parent)?.join(name);
        fs::create_dir(&path).map_err(|e| status_from_io(&e, "create folder failed"))?;
        Ok(FolderHandle::from_remote(Self::child_id(parent, name)))
    }

    fn create_file(
        &self,
        parent: &FolderHandle,
        name: &str,
        _mime_type: Option<&str>,
        content: &mut dyn Read,
    ) -> Result<FileHandle> {
        validate_name(name)?;
        let path = self.folder_path(parent)?.join(name);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| status_from_io(&e, "create file failed"))?;
        io::copy(content, &mut file).map_err(CloudFsError::Transport)?;
        Ok(FileHandle::from_remote(Self::child_id(parent, name), name))
    }
}
