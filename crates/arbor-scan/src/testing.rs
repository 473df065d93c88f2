//! Test fixtures: in-memory repositories and instrumented commit graphs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arbor_store::{
    Blob, Commit, CommitGraph, CommitIter, EntryMode, InMemoryObjectStore, ObjectStore,
    ResolvedCommit, StoreError, StoreGraph, StoreResult, Tree, TreeEntry,
};
use arbor_types::{ObjectId, RepositoryId};

use crate::catalog::{Catalog, Repository};

pub fn dir(name: &str, id: ObjectId) -> TreeEntry {
    TreeEntry::new(EntryMode::Directory, name, id)
}

pub fn file(name: &str, id: ObjectId) -> TreeEntry {
    TreeEntry::new(EntryMode::Regular, name, id)
}

/// Builds the objects of one repository.
pub struct Fixture {
    id: RepositoryId,
    store: Arc<InMemoryObjectStore>,
    heads: Vec<ObjectId>,
    commits: usize,
}

impl Fixture {
    pub fn new(id: &str) -> Self {
        Self {
            id: RepositoryId::new(id).unwrap(),
            store: Arc::new(InMemoryObjectStore::new()),
            heads: Vec::new(),
            commits: 0,
        }
    }

    pub fn blob(&mut self, data: &[u8]) -> ObjectId {
        self.store
            .write(&Blob::new(data.to_vec()).to_stored_object())
            .unwrap()
    }

    pub fn tree(&mut self, entries: Vec<TreeEntry>) -> ObjectId {
        let obj = Tree::new(entries).to_stored_object().unwrap();
        self.store.write(&obj).unwrap()
    }

    /// Write a commit. Every call produces a distinct commit, even for
    /// identical trees and parents.
    pub fn commit(&mut self, tree: ObjectId, parents: &[ObjectId]) -> ObjectId {
        self.commits += 1;
        let commit = parents.iter().fold(
            Commit::new(tree, format!("commit {}", self.commits)),
            |c, p| c.with_parent(*p),
        );
        self.store
            .write(&commit.to_stored_object().unwrap())
            .unwrap()
    }

    pub fn head(&mut self, id: ObjectId) {
        self.heads.push(id);
    }

    pub fn graph(&self) -> StoreGraph {
        StoreGraph::new(self.store.clone(), self.heads.clone())
    }

    pub fn repository(&self) -> Repository {
        Repository::new(self.id.clone(), Arc::new(self.graph()))
    }

    /// A repository whose history cannot be opened at all.
    pub fn failing_repository(&self) -> Repository {
        Repository::new(self.id.clone(), Arc::new(FailingGraph(self.graph())))
    }
}

struct FailingGraph(StoreGraph);

impl CommitGraph for FailingGraph {
    fn list_commits(&self) -> StoreResult<CommitIter<'_>> {
        Err(StoreError::Serialization("refs unreadable".into()))
    }

    fn get_commit(&self, id: &ObjectId) -> StoreResult<ResolvedCommit> {
        self.0.get_commit(id)
    }

    fn get_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        self.0.get_tree(id)
    }
}

#[derive(Clone, Default)]
struct Counters {
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

/// Graph that counts how many commit streams were opened and dropped.
struct TrackedGraph {
    inner: StoreGraph,
    counters: Counters,
}

impl CommitGraph for TrackedGraph {
    fn list_commits(&self) -> StoreResult<CommitIter<'_>> {
        let inner = self.inner.list_commits()?;
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TrackedCommits {
            inner,
            released: self.counters.released.clone(),
        }))
    }

    fn get_commit(&self, id: &ObjectId) -> StoreResult<ResolvedCommit> {
        self.inner.get_commit(id)
    }

    fn get_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        self.inner.get_tree(id)
    }
}

struct TrackedCommits<'a> {
    inner: CommitIter<'a>,
    released: Arc<AtomicUsize>,
}

impl Iterator for TrackedCommits<'_> {
    type Item = StoreResult<ResolvedCommit>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl Drop for TrackedCommits<'_> {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Catalog whose repositories share one pair of stream counters.
pub struct TrackedCatalog {
    catalog: Catalog,
    counters: Counters,
}

impl TrackedCatalog {
    /// Each repository has two commits over a root with one subdirectory.
    pub fn new(ids: &[&str]) -> Self {
        Self::build(ids, |fx| {
            let f = fx.blob(b"data");
            let sub = fx.tree(vec![file("f", f)]);
            let root = fx.tree(vec![dir("sub", sub)]);
            let c1 = fx.commit(root, &[]);
            fx.commit(root, &[c1])
        })
    }

    /// Each repository has a single commit whose root lists a directory
    /// that is missing from the store.
    pub fn with_broken_subtree(ids: &[&str]) -> Self {
        Self::build(ids, |fx| {
            let root = fx.tree(vec![dir("gone", ObjectId::from_bytes(b"missing subtree"))]);
            fx.commit(root, &[])
        })
    }

    fn build(ids: &[&str], populate: impl Fn(&mut Fixture) -> ObjectId) -> Self {
        let counters = Counters::default();
        let mut catalog = Catalog::new();
        for id in ids {
            let mut fx = Fixture::new(id);
            let head = populate(&mut fx);
            fx.head(head);
            let graph = TrackedGraph {
                inner: fx.graph(),
                counters: counters.clone(),
            };
            catalog.add(Repository::new(fx.id.clone(), Arc::new(graph)));
        }
        Self { catalog, counters }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }
}
