//! Lazy folder creation.

use tracing::{debug, info};

use super::find_child_folder;
use crate::remote::{FolderHandle, RemoteStore};
use crate::Result;

/// Return the child folder `name` of `parent`, creating it if absent.
///
/// The check and the create are separate round trips. Two callers racing on
/// the same parent can both see it absent and both create it.
pub fn ensure_folder<S>(store: &S, parent: &FolderHandle, name: &str) -> Result<FolderHandle>
where
    S: RemoteStore + ?Sized,
{
    match find_child_folder(store, parent, name)? {
        Some(existing) => {
            debug!(folder = %name, "Folder already exists");
            Ok(existing)
        }
        None => {
            let created = store.create_folder(parent, name)?;
            info!(folder = %name, id = %created, "Created folder");
            Ok(created)
        }
    }
}

/// Walk `segments` from `start`, creating every folder that is missing.
///
/// Idempotent: when the whole chain exists, no create call is issued.
pub fn ensure_path<S>(store: &S, start: &FolderHandle, segments: &[String]) -> Result<FolderHandle>
where
    S: RemoteStore + ?Sized,
{
    let mut current = start.clone();
    for name in segments {
        current = ensure_folder(store, &current, name)?;
    }
    Ok(current)
}
