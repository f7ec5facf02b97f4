//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use cloudfs::{CloudFs, FolderHandle, MemoryStore, RemoteStore, RootKind};

/// Application name used for the documents folder in fixtures.
pub const APP_NAME: &str = "FixtureApp";

/// A fixed timestamp so listings are deterministic.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
}

/// A service over a fresh in-memory store.
pub fn service() -> CloudFs<MemoryStore> {
    CloudFs::new(MemoryStore::new(), APP_NAME)
}

/// The app-private root of a service's store.
pub fn app_root(fs: &CloudFs<MemoryStore>) -> FolderHandle {
    fs.store().root(RootKind::AppPrivate).unwrap()
}

/// Build `dir/` under the app root with children `a.txt` and `sub/`.
pub fn service_with_dir() -> (CloudFs<MemoryStore>, FolderHandle) {
    let fs = service();
    let root = app_root(&fs);
    let dir = fs.store().add_folder(&root, "dir");
    fs.store().add_file_at(&dir, "a.txt", b"alpha", fixed_time());
    fs.store().add_folder(&dir, "sub");
    (fs, dir)
}
