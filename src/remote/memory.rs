//! In-process remote store.
//!
//! Keeps the whole tree in memory behind a mutex. Children keep insertion
//! order and sibling names may repeat, the same as a real drive. The store
//! counts every call and every listing release so callers can assert on the
//! traffic an operation generated.

use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ChildListing, Entry, FileHandle, FolderHandle, RemoteStore, RootKind};
use crate::error::RemoteStatus;
use crate::{CloudFsError, Result};

/// Status code used when a handle does not name a live folder.
const STATUS_INVALID_HANDLE: i32 = 404;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    is_folder: bool,
    modified: DateTime<Utc>,
    data_valid: bool,
    mime_type: Option<String>,
    content: Vec<u8>,
    children: Vec<String>,
}

impl Node {
    fn folder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_folder: true,
            modified: Utc::now(),
            data_valid: true,
            mime_type: None,
            content: Vec::new(),
            children: Vec::new(),
        }
    }

    fn file(name: &str, content: Vec<u8>, modified: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            is_folder: false,
            modified,
            data_valid: true,
            mime_type: None,
            content,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Faults {
    list: Option<RemoteStatus>,
    create_folder: Option<RemoteStatus>,
    create_file: Option<RemoteStatus>,
}

#[derive(Debug)]
struct Inner {
    nodes: HashMap<String, Node>,
    app_root: String,
    drive_root: String,
    faults: Faults,
    latency: Duration,
}

/// Counters describing the traffic a [`MemoryStore`] has served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// `list_children` calls, including failed ones.
    pub list_calls: usize,
    /// Listing buffers released so far.
    pub releases: usize,
    /// `create_folder` calls, including failed ones.
    pub create_folder_calls: usize,
    /// Folders created while a same-named folder already existed.
    pub duplicate_folder_creates: usize,
    /// `create_file` calls, including failed ones.
    pub create_file_calls: usize,
}

impl StoreStats {
    /// Listing buffers handed out and not yet released.
    pub fn outstanding_listings(&self) -> usize {
        self.list_calls.saturating_sub(self.releases)
    }
}

#[derive(Debug, Default)]
struct Counters {
    list_calls: AtomicUsize,
    releases: Arc<AtomicUsize>,
    create_folder_calls: AtomicUsize,
    duplicate_folder_creates: AtomicUsize,
    create_file_calls: AtomicUsize,
}

/// Remote store held entirely in memory.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    counters: Counters,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store with an empty app folder and an empty drive root.
    pub fn new() -> Self {
        let app_root = Uuid::new_v4().to_string();
        let drive_root = Uuid::new_v4().to_string();
        let mut nodes = HashMap::new();
        nodes.insert(app_root.clone(), Node::folder("appDataFolder"));
        nodes.insert(drive_root.clone(), Node::folder("root"));

        Self {
            inner: Mutex::new(Inner {
                nodes,
                app_root,
                drive_root,
                faults: Faults::default(),
                latency: Duration::ZERO,
            }),
            counters: Counters::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delay every store call by `latency`, outside the store's lock.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Make the next `list_children` call fail with `status`.
    pub fn fail_next_list(&self, status: RemoteStatus) {
        self.lock().faults.list = Some(status);
    }

    /// Make the next `create_folder` call fail with `status`.
    pub fn fail_next_create_folder(&self, status: RemoteStatus) {
        self.lock().faults.create_folder = Some(status);
    }

    /// Make the next `create_file` call fail with `status`.
    pub fn fail_next_create_file(&self, status: RemoteStatus) {
        self.lock().faults.create_file = Some(status);
    }

    /// Snapshot of the call counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            list_calls: self.counters.list_calls.load(Ordering::SeqCst),
            releases: self.counters.releases.load(Ordering::SeqCst),
            create_folder_calls: self.counters.create_folder_calls.load(Ordering::SeqCst),
            duplicate_folder_creates: self
                .counters
                .duplicate_folder_creates
                .load(Ordering::SeqCst),
            create_file_calls: self.counters.create_file_calls.load(Ordering::SeqCst),
        }
    }

    /// Add a folder under `parent` without counting it as a create call.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a folder of this store.
    pub fn add_folder(&self, parent: &FolderHandle, name: &str) -> FolderHandle {
        let id = self.insert(parent, Node::folder(name));
        FolderHandle::from_remote(id)
    }

    /// Add a file under `parent` without counting it as a create call.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a folder of this store.
    pub fn add_file(&self, parent: &FolderHandle, name: &str, content: &[u8]) -> FileHandle {
        self.add_file_at(parent, name, content, Utc::now())
    }

    /// Add a file with a fixed modification time.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a folder of this store.
    pub fn add_file_at(
        &self,
        parent: &FolderHandle,
        name: &str,
        content: &[u8],
        modified: DateTime<Utc>,
    ) -> FileHandle {
        let id = self.insert(parent, Node::file(name, content.to_vec(), modified));
        FileHandle::from_remote(id, name)
    }

    /// Add a file whose metadata the store has not populated yet.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a folder of this store.
    pub fn add_pending_file(&self, parent: &FolderHandle, name: &str) -> FileHandle {
        let mut node = Node::file(name, Vec::new(), DateTime::<Utc>::UNIX_EPOCH);
        node.data_valid = false;
        let id = self.insert(parent, node);
        FileHandle::from_remote(id, name)
    }

    fn insert(&self, parent: &FolderHandle, node: Node) -> String {
        let mut inner = self.lock();
        let id = Uuid::new_v4().to_string();
        match inner.nodes.get_mut(parent.id()) {
            Some(p) if p.is_folder => p.children.push(id.clone()),
            _ => panic!("{} is not a folder of this store", parent.id()),
        }
        inner.nodes.insert(id.clone(), node);
        id
    }

    /// Titles of the children of `folder`, in listing order.
    pub fn child_names(&self, folder: &FolderHandle) -> Vec<String> {
        let inner = self.lock();
        inner
            .nodes
            .get(folder.id())
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|id| inner.nodes.get(id))
                    .map(|child| child.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Content of a stored file.
    pub fn file_content(&self, file: &FileHandle) -> Option<Vec<u8>> {
        self.lock()
            .nodes
            .get(file.id())
            .filter(|node| !node.is_folder)
            .map(|node| node.content.clone())
    }

    /// MIME type a file was created with.
    pub fn file_mime_type(&self, file: &FileHandle) -> Option<String> {
        self.lock()
            .nodes
            .get(file.id())
            .and_then(|node| node.mime_type.clone())
    }

    fn pause(&self) {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }
    }
}

fn invalid_handle(id: &str) -> CloudFsError {
    CloudFsError::Remote(RemoteStatus::new(
        STATUS_INVALID_HANDLE,
        format!("no folder with id {id}"),
    ))
}

impl RemoteStore for MemoryStore {
    fn root(&self, kind: RootKind) -> Result<FolderHandle> {
        let inner = self.lock();
        let id = match kind {
            RootKind::AppPrivate => &inner.app_root,
            RootKind::Documents => &inner.drive_root,
        };
        Ok(FolderHandle::from_remote(id.clone()))
    }

    fn list_children(&self, folder: &FolderHandle) -> Result<ChildListing> {
        self.counters.list_calls.fetch_add(1, Ordering::SeqCst);
        self.pause();

        let entries = {
            let mut inner = self.lock();
            if let Some(status) = inner.faults.list.take() {
                // A failed call still hands back nothing to release.
                self.counters.releases.fetch_add(1, Ordering::SeqCst);
                return Err(CloudFsError::Remote(status));
            }
            let node = match inner.nodes.get(folder.id()) {
                Some(node) if node.is_folder => node,
                _ => {
                    self.counters.releases.fetch_add(1, Ordering::SeqCst);
                    return Err(invalid_handle(folder.id()));
                }
            };
            node.children
                .iter()
                .filter_map(|id| inner.nodes.get(id).map(|child| (id, child)))
                .map(|(id, child)| Entry {
                    name: child.name.clone(),
                    is_folder: child.is_folder,
                    modified: child.modified,
                    size: child.content.len() as u64,
                    id: id.clone(),
                    data_valid: child.data_valid,
                })
                .collect::<Vec<_>>()
        };

        let releases = Arc::clone(&self.counters.releases);
        Ok(ChildListing::with_release(entries, move || {
            releases.fetch_add(1, Ordering::SeqCst);
        }))
    }

    fn create_folder(&self, parent: &FolderHandle, name: &str) -> Result<FolderHandle> {
        self.counters.create_folder_calls.fetch_add(1, Ordering::SeqCst);
        self.pause();

        let mut inner = self.lock();
        if let Some(status) = inner.faults.create_folder.take() {
            return Err(CloudFsError::Remote(status));
        }
        let duplicate = match inner.nodes.get(parent.id()) {
            Some(p) if p.is_folder => p.children.iter().any(|id| {
                inner
                    .nodes
                    .get(id)
                    .is_some_and(|child| child.is_folder && child.name == name)
            }),
            _ => return Err(invalid_handle(parent.id())),
        };
        if duplicate {
            self.counters
                .duplicate_folder_creates
                .fetch_add(1, Ordering::SeqCst);
        }

        let id = Uuid::new_v4().to_string();
        inner.nodes.insert(id.clone(), Node::folder(name));
        if let Some(p) = inner.nodes.get_mut(parent.id()) {
            p.children.push(id.clone());
        }
        Ok(FolderHandle::from_remote(id))
    }

    fn create_file(
        &self,
        parent: &FolderHandle,
        name: &str,
        mime_type: Option<&str>,
        content: &mut dyn Read,
    ) -> Result<FileHandle> {
        self.counters.create_file_calls.fetch_add(1, Ordering::SeqCst);
        self.pause();

        if let Some(status) = self.lock().faults.create_file.take() {
            return Err(CloudFsError::Remote(status));
        }

        let mut bytes = Vec::new();
        content
            .read_to_end(&mut bytes)
            .map_err(CloudFsError::Transport)?;

        let mut inner = self.lock();
        match inner.nodes.get(parent.id()) {
            Some(p) if p.is_folder => {}
            _ => return Err(invalid_handle(parent.id())),
        }

        let id = Uuid::new_v4().to_string();
        let mut node = Node::file(name, bytes, Utc::now());
        node.mime_type = mime_type.map(str::to_string);
        inner.nodes.insert(id.clone(), node);
        if let Some(p) = inner.nodes.get_mut(parent.id()) {
            p.children.push(id.clone());
        }
        Ok(FileHandle::from_remote(id, name))
    }
}
