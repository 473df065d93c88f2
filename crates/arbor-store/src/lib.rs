//! Content-addressed object storage for arbor.
//!
//! Commits, trees and blobs are immutable objects identified by their BLAKE3
//! hash (domain-separated by object kind). On top of the raw key-value
//! [`ObjectStore`], the [`CommitGraph`] trait is the read surface scanners
//! use: enumerate history, resolve a commit, resolve a tree.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw file content
//! - [`Tree`] -- directory listing mapping names to object references
//! - [`Commit`] -- one root tree plus parent links
//!
//! # Backends
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`StoreGraph`] -- [`CommitGraph`] over any [`ObjectStore`] and a set of heads

pub mod error;
pub mod graph;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use graph::{History, StoreGraph};
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Commit, EntryMode, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::{CommitGraph, CommitIter, ObjectStore, ResolvedCommit};
