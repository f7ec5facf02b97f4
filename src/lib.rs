//! cloudfs - path operations over a remote, tree-structured object store.
//!
//! The store addresses folders and files by opaque handles and offers little
//! more than "list the children of a folder" and "create something under a
//! folder". This crate layers path semantics on top of that:
//!
//! - resolving slash-delimited paths ([`path::resolve`])
//! - walking to a folder, or creating the missing ones ([`navigate`])
//! - existence checks and collision-free upload names ([`exists`], [`naming`])
//! - normalized directory listings ([`listing`])
//!
//! [`CloudFs`] bundles these behind the calls a host application makes.

pub mod config;
pub mod datetime;
pub mod error;
pub mod exists;
pub mod listing;
pub mod logging;
pub mod naming;
pub mod navigate;
pub mod path;
pub mod remote;
pub mod roots;
pub mod service;

pub use config::Config;
pub use error::{CloudFsError, RemoteStatus, Result};
pub use listing::{DirectoryListing, NormalizedEntry};
pub use navigate::{EntryVisitor, Lookup};
pub use path::{resolve, PathSegments};
pub use remote::{
    ChildListing, Entry, FileHandle, FolderHandle, LocalDirStore, MemoryStore, RemoteStore,
    RootKind,
};
pub use roots::RootResolver;
pub use service::CloudFs;
