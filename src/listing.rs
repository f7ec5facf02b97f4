//! Directory listings in the shape the host bridge forwards to applications.

use serde::Serialize;
use tracing::debug;

use crate::datetime::format_modified;
use crate::navigate::{navigate, visit, EntryVisitor};
use crate::remote::{Entry, FolderHandle, RemoteStore};
use crate::Result;

/// One child in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntry {
    pub is_directory: bool,
    pub is_file: bool,
    pub name: String,
    /// Modification time, e.g. `2024-01-15T10:30:00+0000`.
    pub last_modified: String,
    /// The child's stable store identifier, not a slash path.
    pub path: String,
    pub size: u64,
}

/// Result of listing a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryListing {
    /// The normalized request path, `/`-joined.
    pub path: String,
    pub files: Vec<NormalizedEntry>,
}

struct Normalizer<'a> {
    timezone: &'a str,
    files: Vec<NormalizedEntry>,
    skipped: usize,
}

impl EntryVisitor for Normalizer<'_> {
    fn visit_entry(&mut self, entry: &Entry) {
        if !entry.data_valid {
            self.skipped += 1;
            return;
        }
        self.files.push(NormalizedEntry {
            is_directory: entry.is_folder,
            is_file: !entry.is_folder,
            name: entry.name.clone(),
            last_modified: format_modified(&entry.modified, self.timezone),
            path: entry.id.clone(),
            size: entry.size,
        });
    }
}

/// List the folder `segments` resolve to from `root`.
///
/// Children whose metadata is not valid yet are skipped. Order is the
/// store's listing order. Fails with
/// [`CloudFsError::NotFound`](crate::CloudFsError::NotFound) naming the first
/// segment that could not be resolved.
pub fn list<S>(
    store: &S,
    root: &FolderHandle,
    segments: &[String],
    timezone: &str,
) -> Result<DirectoryListing>
where
    S: RemoteStore + ?Sized,
{
    let folder = navigate(store, root, segments)?.into_result()?;

    let mut normalizer = Normalizer {
        timezone,
        files: Vec::new(),
        skipped: 0,
    };
    visit(store, &folder, &mut normalizer)?;

    let path = segments.join("/");
    debug!(
        path = %path,
        count = normalizer.files.len(),
        skipped = normalizer.skipped,
        "Listed directory"
    );

    Ok(DirectoryListing {
        path,
        files: normalizer.files,
    })
}
