//! Folder navigation over the remote store.
//!
//! Every level of a path costs one listing call. Nothing is cached between
//! calls: the tree can change under us, and a stale handle would go unnoticed.
//!
//! - [`navigate`]: walk existing folders, reporting the first missing segment
//! - [`ensure_path`]: walk and create whatever is missing
//! - [`visit`]: hand every child of one folder to a visitor

mod creator;

use tracing::trace;

use crate::remote::{Entry, FolderHandle, RemoteStore};
use crate::{CloudFsError, Result};

pub use creator::{ensure_folder, ensure_path};

/// Outcome of walking a path of folder names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Every segment resolved; the terminal folder.
    Found(FolderHandle),
    /// The first segment that is not a folder among its parent's children.
    NotFound(String),
}

impl Lookup {
    /// The folder, if it was found.
    pub fn found(self) -> Option<FolderHandle> {
        match self {
            Lookup::Found(folder) => Some(folder),
            Lookup::NotFound(_) => None,
        }
    }

    /// Turn a miss into [`CloudFsError::NotFound`].
    pub fn into_result(self) -> Result<FolderHandle> {
        match self {
            Lookup::Found(folder) => Ok(folder),
            Lookup::NotFound(segment) => Err(CloudFsError::NotFound(segment)),
        }
    }
}

/// Receives each child of a listed folder.
pub trait EntryVisitor {
    /// Called once per child, in listing order.
    fn visit_entry(&mut self, entry: &Entry);
}

impl<F: FnMut(&Entry)> EntryVisitor for F {
    fn visit_entry(&mut self, entry: &Entry) {
        self(entry)
    }
}

/// List `folder` once and pass every child to `visitor`, unfiltered.
pub fn visit<S, V>(store: &S, folder: &FolderHandle, visitor: &mut V) -> Result<()>
where
    S: RemoteStore + ?Sized,
    V: EntryVisitor + ?Sized,
{
    let children = store.list_children(folder)?;
    for entry in &children {
        visitor.visit_entry(entry);
    }
    Ok(())
}

/// Find the first child folder of `parent` titled `name`.
///
/// A file with that title does not count.
pub fn find_child_folder<S>(
    store: &S,
    parent: &FolderHandle,
    name: &str,
) -> Result<Option<FolderHandle>>
where
    S: RemoteStore + ?Sized,
{
    let children = store.list_children(parent)?;
    let folder = children
        .iter()
        .find(|entry| entry.is_folder && entry.name == name)
        .and_then(Entry::folder_handle);
    Ok(folder)
}

/// Walk `segments` from `start`, one listing per level.
///
/// Store failures are returned as errors. A missing segment is not an error:
/// it comes back as [`Lookup::NotFound`].
pub fn navigate<S>(store: &S, start: &FolderHandle, segments: &[String]) -> Result<Lookup>
where
    S: RemoteStore + ?Sized,
{
    let mut current = start.clone();
    for segment in segments {
        match find_child_folder(store, &current, segment)? {
            Some(next) => {
                trace!(segment = %segment, folder = %next, "Descended");
                current = next;
            }
            None => return Ok(Lookup::NotFound(segment.clone())),
        }
    }
    Ok(Lookup::Found(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteStatus;
    use crate::path::resolve;
    use crate::remote::{MemoryStore, RootKind};

    fn setup() -> (MemoryStore, FolderHandle) {
        let store = MemoryStore::new();
        let root = store.root(RootKind::AppPrivate).unwrap();
        (store, root)
    }

    #[test]
    fn test_navigate_empty_path_returns_start() {
        let (store, root) = setup();
        let lookup = navigate(&store, &root, &[]).unwrap();
        assert_eq!(lookup, Lookup::Found(root));
        assert_eq!(store.stats().list_calls, 0);
    }

    #[test]
    fn test_navigate_nested() {
        let (store, root) = setup();
        let a = store.add_folder(&root, "a");
        let b = store.add_folder(&a, "b");

        let lookup = navigate(&store, &root, &resolve("a/b")).unwrap();
        assert_eq!(lookup, Lookup::Found(b));
        assert_eq!(store.stats().list_calls, 2);
    }

    #[test]
    fn test_navigate_missing_segment() {
        let (store, root) = setup();
        store.add_folder(&root, "a");

        let lookup = navigate(&store, &root, &resolve("a/missing/deeper")).unwrap();
        assert_eq!(lookup, Lookup::NotFound("missing".to_string()));
        // The walk stops at the first miss.
        assert_eq!(store.stats().list_calls, 2);
    }

    #[test]
    fn test_navigate_file_is_not_a_folder() {
        let (store, root) = setup();
        store.add_file(&root, "a", b"file");

        let lookup = navigate(&store, &root, &resolve("a")).unwrap();
        assert_eq!(lookup, Lookup::NotFound("a".to_string()));
    }

    #[test]
    fn test_navigate_skips_file_to_reach_folder_of_same_name() {
        let (store, root) = setup();
        store.add_file(&root, "a", b"file");
        let folder = store.add_folder(&root, "a");

        let lookup = navigate(&store, &root, &resolve("a")).unwrap();
        assert_eq!(lookup, Lookup::Found(folder));
    }

    #[test]
    fn test_navigate_duplicate_siblings_first_wins() {
        let (store, root) = setup();
        let first = store.add_folder(&root, "dup");
        store.add_folder(&root, "dup");

        let lookup = navigate(&store, &root, &resolve("dup")).unwrap();
        assert_eq!(lookup.found(), Some(first));
    }

    #[test]
    fn test_navigate_releases_every_listing() {
        let (store, root) = setup();
        let a = store.add_folder(&root, "a");
        store.add_folder(&a, "b");

        navigate(&store, &root, &resolve("a/b")).unwrap();
        navigate(&store, &root, &resolve("a/nope")).unwrap();

        let stats = store.stats();
        assert_eq!(stats.list_calls, 4);
        assert_eq!(stats.outstanding_listings(), 0);
    }

    #[test]
    fn test_navigate_propagates_remote_failure() {
        let (store, root) = setup();
        store.add_folder(&root, "a");
        store.fail_next_list(RemoteStatus::new(500, "backend error"));

        let err = navigate(&store, &root, &resolve("a")).unwrap_err();
        assert_eq!(err.remote_status(), Some(&RemoteStatus::new(500, "backend error")));
        assert_eq!(store.stats().outstanding_listings(), 0);
    }

    #[test]
    fn test_lookup_into_result() {
        let handle = FolderHandle::from_remote("x");
        assert_eq!(Lookup::Found(handle.clone()).into_result().unwrap(), handle);

        let err = Lookup::NotFound("gone".to_string()).into_result().unwrap_err();
        assert!(matches!(err, CloudFsError::NotFound(ref s) if s == "gone"));
    }

    #[test]
    fn test_visit_sees_every_child_in_order() {
        let (store, root) = setup();
        store.add_file(&root, "one", b"1");
        store.add_folder(&root, "two");
        store.add_pending_file(&root, "three");

        let mut seen = Vec::new();
        visit(&store, &root, &mut |entry: &Entry| seen.push(entry.name.clone())).unwrap();

        assert_eq!(seen, vec!["one", "two", "three"]);
        assert_eq!(store.stats().outstanding_listings(), 0);
    }

    #[test]
    fn test_visit_with_struct_visitor() {
        struct Counter {
            folders: usize,
            files: usize,
        }

        impl EntryVisitor for Counter {
            fn visit_entry(&mut self, entry: &Entry) {
                if entry.is_folder {
                    self.folders += 1;
                } else {
                    self.files += 1;
                }
            }
        }

        let (store, root) = setup();
        store.add_folder(&root, "d");
        store.add_file(&root, "f1", b"");
        store.add_file(&root, "f2", b"");

        let mut counter = Counter { folders: 0, files: 0 };
        visit(&store, &root, &mut counter).unwrap();
        assert_eq!(counter.folders, 1);
        assert_eq!(counter.files, 2);
    }
}
