//! [`CommitGraph`] over any [`ObjectStore`].
//!
//! History is enumerated lazily from a set of branch heads: one commit is
//! read per step, in pre-order depth-first order over parent links (first
//! parent first). Every commit is visited once even when several heads or
//! merges reach it.

use std::collections::HashSet;
use std::sync::Arc;

use arbor_types::ObjectId;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::{Commit, StoredObject, Tree};
use crate::traits::{CommitGraph, CommitIter, ObjectStore, ResolvedCommit};

/// Read an object and check that its content still hashes to `id`.
fn load_verified(store: &dyn ObjectStore, id: &ObjectId) -> StoreResult<StoredObject> {
    let obj = store.read(id)?.ok_or(StoreError::NotFound(*id))?;
    let computed = obj.compute_id();
    if computed != *id {
        return Err(StoreError::HashMismatch { id: *id, computed });
    }
    Ok(obj)
}

fn read_commit(store: &dyn ObjectStore, id: &ObjectId) -> StoreResult<ResolvedCommit> {
    let obj = load_verified(store, id)?;
    Ok(ResolvedCommit {
        id: *id,
        commit: Commit::from_stored_object(&obj)?,
    })
}

fn read_tree(store: &dyn ObjectStore, id: &ObjectId) -> StoreResult<Tree> {
    Tree::from_stored_object(&load_verified(store, id)?)
}

/// Commit graph of one repository whose objects live in an [`ObjectStore`].
#[derive(Clone)]
pub struct StoreGraph {
    store: Arc<dyn ObjectStore>,
    heads: Vec<ObjectId>,
}

impl StoreGraph {
    pub fn new(store: Arc<dyn ObjectStore>, heads: Vec<ObjectId>) -> Self {
        Self { store, heads }
    }
}

impl std::fmt::Debug for StoreGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreGraph")
            .field("heads", &self.heads)
            .finish_non_exhaustive()
    }
}

impl CommitGraph for StoreGraph {
    fn list_commits(&self) -> StoreResult<CommitIter<'_>> {
        Ok(Box::new(History::new(self.store.as_ref(), &self.heads)))
    }

    fn get_commit(&self, id: &ObjectId) -> StoreResult<ResolvedCommit> {
        read_commit(self.store.as_ref(), id)
    }

    fn get_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        read_tree(self.store.as_ref(), id)
    }
}

/// Lazy pre-order walk over parent links.
pub struct History<'a> {
    store: &'a dyn ObjectStore,
    stack: Vec<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<'a> History<'a> {
    pub fn new(store: &'a dyn ObjectStore, heads: &[ObjectId]) -> Self {
        let mut seen = HashSet::new();
        let mut stack: Vec<ObjectId> = heads.iter().copied().filter(|h| seen.insert(*h)).collect();
        // First head on top.
        stack.reverse();
        Self { store, stack, seen }
    }
}

impl Iterator for History<'_> {
    type Item = StoreResult<ResolvedCommit>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        match read_commit(self.store, &id) {
            Ok(resolved) => {
                for parent in resolved.commit.parents.iter().rev() {
                    if self.seen.insert(*parent) {
                        self.stack.push(*parent);
                    }
                }
                Some(Ok(resolved))
            }
            Err(e) => {
                debug!(commit = %id.short_hex(), error = %e, "history walk hit unreadable commit");
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryObjectStore;
    use crate::object::{Blob, EntryMode, TreeEntry};

    fn store() -> Arc<InMemoryObjectStore> {
        Arc::new(InMemoryObjectStore::new())
    }

    fn write_tree(store: &InMemoryObjectStore, entries: Vec<TreeEntry>) -> ObjectId {
        store
            .write(&Tree::new(entries).to_stored_object().unwrap())
            .unwrap()
    }

    fn write_commit(store: &InMemoryObjectStore, commit: Commit) -> ObjectId {
        store.write(&commit.to_stored_object().unwrap()).unwrap()
    }

    fn ids(graph: &StoreGraph) -> Vec<StoreResult<ObjectId>> {
        graph
            .list_commits()
            .unwrap()
            .map(|r| r.map(|c| c.id))
            .collect()
    }

    #[test]
    fn linear_history_newest_first() {
        let s = store();
        let tree = write_tree(&s, vec![]);
        let c1 = write_commit(&s, Commit::new(tree, "one"));
        let c2 = write_commit(&s, Commit::new(tree, "two").with_parent(c1));
        let c3 = write_commit(&s, Commit::new(tree, "three").with_parent(c2));

        let graph = StoreGraph::new(s, vec![c3]);
        let walked: Vec<_> = ids(&graph).into_iter().map(Result::unwrap).collect();
        assert_eq!(walked, vec![c3, c2, c1]);
    }

    #[test]
    fn merge_visits_shared_ancestor_once() {
        let s = store();
        let tree = write_tree(&s, vec![]);
        let base = write_commit(&s, Commit::new(tree, "base"));
        let left = write_commit(&s, Commit::new(tree, "left").with_parent(base));
        let right = write_commit(&s, Commit::new(tree, "right").with_parent(base));
        let merge = write_commit(
            &s,
            Commit::new(tree, "merge").with_parent(left).with_parent(right),
        );

        let graph = StoreGraph::new(s, vec![merge, left]);
        let walked: Vec<_> = ids(&graph).into_iter().map(Result::unwrap).collect();
        assert_eq!(walked.len(), 4);
        assert_eq!(walked[0], merge);
        assert_eq!(walked[1], left);
        let unique: HashSet<_> = walked.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn multiple_heads_start_with_first() {
        let s = store();
        let tree = write_tree(&s, vec![]);
        let a = write_commit(&s, Commit::new(tree, "a"));
        let b = write_commit(&s, Commit::new(tree, "b"));
        let graph = StoreGraph::new(s, vec![a, b, a]);
        let walked: Vec<_> = ids(&graph).into_iter().map(Result::unwrap).collect();
        assert_eq!(walked, vec![a, b]);
    }

    #[test]
    fn missing_parent_is_reported_and_walk_continues() {
        let s = store();
        let tree = write_tree(&s, vec![]);
        let ghost = ObjectId::from_bytes(b"ghost");
        let root = write_commit(&s, Commit::new(tree, "root"));
        let tip = write_commit(
            &s,
            Commit::new(tree, "tip").with_parent(ghost).with_parent(root),
        );

        let graph = StoreGraph::new(s, vec![tip]);
        let walked = ids(&graph);
        assert_eq!(walked.len(), 3);
        assert_eq!(*walked[0].as_ref().unwrap(), tip);
        assert!(matches!(walked[1], Err(StoreError::NotFound(id)) if id == ghost));
        assert_eq!(*walked[2].as_ref().unwrap(), root);
    }

    #[test]
    fn get_tree_and_commit_resolve() {
        let s = store();
        let blob = s.write(&Blob::new(b"x".to_vec()).to_stored_object()).unwrap();
        let tree = write_tree(&s, vec![TreeEntry::new(EntryMode::Regular, "x", blob)]);
        let commit = write_commit(&s, Commit::new(tree, "c"));
        let graph = StoreGraph::new(s, vec![commit]);

        let resolved = graph.get_commit(&commit).unwrap();
        assert_eq!(resolved.id, commit);
        assert_eq!(resolved.tree(), tree);
        assert_eq!(graph.get_root_tree(&resolved).unwrap().len(), 1);
    }

    #[test]
    fn wrong_kind_is_corrupt() {
        let s = store();
        let tree = write_tree(&s, vec![]);
        let graph = StoreGraph::new(s, vec![]);
        let err = graph.get_commit(&tree).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn tampered_object_fails_verification() {
        let s = store();
        let forged = ObjectId::from_bytes(b"forged");
        s.insert_unchecked(forged, Tree::empty().to_stored_object().unwrap());
        let graph = StoreGraph::new(s, vec![]);
        let err = graph.get_tree(&forged).unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { id, .. } if id == forged));
    }

    #[test]
    fn missing_tree_is_not_found() {
        let graph = StoreGraph::new(store(), vec![]);
        let missing = ObjectId::from_bytes(b"nope");
        assert!(graph.get_tree(&missing).unwrap_err().is_not_found());
        assert_eq!(graph.list_commits().unwrap().count(), 0);
    }
}
