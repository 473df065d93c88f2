use arbor_types::ObjectId;

use crate::error::StoreResult;
use crate::object::{Commit, StoredObject, Tree};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written; the same data always produces the
///   same ID.
/// - Concurrent reads are always safe.
/// - The store never interprets object contents.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content-addressed ID.
    ///
    /// If the object already exists, this is a no-op.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;
}

/// A commit together with the id it was resolved from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCommit {
    pub id: ObjectId,
    pub commit: Commit,
}

impl ResolvedCommit {
    /// Id of the commit's root tree.
    pub fn tree(&self) -> ObjectId {
        self.commit.tree
    }
}

/// Lazy enumeration of a repository's commits.
///
/// Dropping the iterator releases whatever it holds open.
pub type CommitIter<'a> = Box<dyn Iterator<Item = StoreResult<ResolvedCommit>> + 'a>;

/// Read access to one repository's history and trees.
///
/// This is the narrow surface scanners consume: enumerate commits, resolve a
/// commit by hash, and resolve trees. Lookups of absent objects fail with
/// [`StoreError::NotFound`](crate::StoreError::NotFound).
pub trait CommitGraph: Send + Sync {
    /// Enumerate the full history in an implementation-defined order.
    ///
    /// An `Err` item reports a commit that could not be loaded; iteration may
    /// continue past it.
    fn list_commits(&self) -> StoreResult<CommitIter<'_>>;

    fn get_commit(&self, id: &ObjectId) -> StoreResult<ResolvedCommit>;

    fn get_tree(&self, id: &ObjectId) -> StoreResult<Tree>;

    fn get_root_tree(&self, commit: &ResolvedCommit) -> StoreResult<Tree> {
        self.get_tree(&commit.tree())
    }
}
