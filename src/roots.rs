//! Root folder resolution.
//!
//! The app-private root is handed out by the store as-is. The documents root
//! is a top-level folder of the user's drive, titled after the application,
//! and is created on first use.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::navigate::find_child_folder;
use crate::remote::{FolderHandle, RemoteStore, RootKind};
use crate::Result;

/// Resolves root selectors to folder handles.
#[derive(Debug)]
pub struct RootResolver {
    app_name: String,
    /// Serializes observe-then-create of the documents folder.
    documents_lock: Mutex<()>,
}

impl RootResolver {
    /// Create a resolver whose documents folder is titled `app_name`.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            documents_lock: Mutex::new(()),
        }
    }

    /// Title of the documents folder.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// The app-private root.
    pub fn app_folder<S>(&self, store: &S) -> Result<FolderHandle>
    where
        S: RemoteStore + ?Sized,
    {
        store.root(RootKind::AppPrivate)
    }

    /// The documents folder, created under the drive root if absent.
    ///
    /// Only one thread at a time may look the folder up and create it. The
    /// handle is not cached; every call re-lists the drive root.
    pub fn documents_folder<S>(&self, store: &S) -> Result<FolderHandle>
    where
        S: RemoteStore + ?Sized,
    {
        // The guard holds no data, so a poisoned lock is still usable.
        let _guard = self
            .documents_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let drive_root = store.root(RootKind::Documents)?;
        if let Some(folder) = find_child_folder(store, &drive_root, &self.app_name)? {
            debug!(folder = %self.app_name, "Documents folder exists");
            return Ok(folder);
        }

        info!(folder = %self.app_name, "Creating documents folder");
        store.create_folder(&drive_root, &self.app_name)
    }

    /// Resolve a root selector.
    pub fn resolve<S>(&self, store: &S, kind: RootKind) -> Result<FolderHandle>
    where
        S: RemoteStore + ?Sized,
    {
        match kind {
            RootKind::AppPrivate => self.app_folder(store),
            RootKind::Documents => self.documents_folder(store),
        }
    }
}
