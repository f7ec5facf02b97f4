//! Collision-free names for uploads.

use tracing::warn;

use crate::exists::exists_in_folder;
use crate::remote::{FolderHandle, RemoteStore};
use crate::Result;

/// Find a title for `desired` that no child of `folder` currently uses.
///
/// Candidates are `desired`, `1.desired`, `2.desired`, ... and each probe
/// lists the folder afresh. The answer is only as good as the moment of the
/// last probe: a concurrent writer can still take the name before upload.
pub fn allocate<S>(store: &S, folder: &FolderHandle, desired: &str) -> Result<String>
where
    S: RemoteStore + ?Sized,
{
    let mut count: u64 = 1;
    let mut candidate = desired.to_string();
    while exists_in_folder(store, folder, &candidate)? {
        warn!(name = %desired, taken = %candidate, "Item already at location");
        candidate = format!("{count}.{desired}");
        count += 1;
    }
    Ok(candidate)
}
