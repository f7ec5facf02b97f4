//! Existence checks against folder listings.

use tracing::debug;

use crate::navigate::{navigate, visit, Lookup};
use crate::remote::{Entry, FolderHandle, RemoteStore};
use crate::Result;

/// Whether any immediate child of `folder` is titled `name`, of either kind.
pub fn exists_in_folder<S>(store: &S, folder: &FolderHandle, name: &str) -> Result<bool>
where
    S: RemoteStore + ?Sized,
{
    let children = store.list_children(folder)?;
    let found = children.iter().any(|entry| entry.name == name);
    Ok(found)
}

/// Whether the last segment names a child of the folder the rest resolve to.
///
/// An unresolvable parent chain answers `false`, the same as an absent leaf.
/// The root itself (no segments) answers `false`. Store failures are still
/// returned as errors.
pub fn exists_at_path<S>(store: &S, root: &FolderHandle, segments: &[String]) -> Result<bool>
where
    S: RemoteStore + ?Sized,
{
    let Some((name, parents)) = segments.split_last() else {
        return Ok(false);
    };

    let parent = match navigate(store, root, parents)? {
        Lookup::Found(folder) => folder,
        Lookup::NotFound(segment) => {
            debug!(segment = %segment, "Parent folder missing");
            return Ok(false);
        }
    };

    let mut found = false;
    visit(store, &parent, &mut |entry: &Entry| {
        if !found && entry.name == *name {
            found = true;
        }
    })?;
    Ok(found)
}
