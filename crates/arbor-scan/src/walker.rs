//! Depth-first flattening of one commit's directory trees.
//!
//! The walker yields the root tree first, then every directory reachable
//! from it through directory entries. Files, symlinks and submodules are
//! never yielded. A subtree reachable along several paths is yielded once;
//! the seen-set lives for one walk only.
//!
//! A directory is yielded only once its tree has been read. If the read
//! fails, the walk ends with that error and the directory is not yielded.

use std::collections::HashSet;
use std::vec;

use arbor_store::{CommitGraph, ResolvedCommit, TreeEntry};
use arbor_types::ObjectId;

use crate::error::ScanResult;

pub struct TreeWalker<'a> {
    graph: &'a dyn CommitGraph,
    commit: ObjectId,
    /// Root tree id, until it has been yielded.
    root: Option<ObjectId>,
    /// One entry iterator per open directory, innermost last.
    stack: Vec<vec::IntoIter<TreeEntry>>,
    seen: HashSet<ObjectId>,
    closed: bool,
}

impl<'a> TreeWalker<'a> {
    /// Start a walk at `commit`'s root tree.
    ///
    /// Fails if the root tree cannot be resolved.
    pub fn new(graph: &'a dyn CommitGraph, commit: &ResolvedCommit) -> ScanResult<Self> {
        let root_id = commit.tree();
        let root = graph.get_root_tree(commit)?;
        let mut seen = HashSet::new();
        seen.insert(root_id);
        Ok(Self {
            graph,
            commit: commit.id,
            root: Some(root_id),
            stack: vec![root.entries.into_iter()],
            seen,
            closed: false,
        })
    }

    /// Commit this walk belongs to.
    pub fn commit(&self) -> ObjectId {
        self.commit
    }

    /// Release the walk's state. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        #[cfg(test)]
        WALKS_CLOSED.with(|n| n.set(n.get() + 1));
        self.closed = true;
        self.root = None;
        self.stack.clear();
        self.seen.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for TreeWalker<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
thread_local! {
    static WALKS_CLOSED: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Number of walks closed on the current thread.
#[cfg(test)]
pub(crate) fn walks_closed() -> usize {
    WALKS_CLOSED.with(std::cell::Cell::get)
}

impl Iterator for TreeWalker<'_> {
    type Item = ScanResult<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        if let Some(root) = self.root.take() {
            return Some(Ok(root));
        }
        loop {
            let Some(entries) = self.stack.last_mut() else {
                self.close();
                return None;
            };
            match entries.next() {
                None => {
                    self.stack.pop();
                }
                Some(entry) if entry.mode.is_directory() && self.seen.insert(entry.object_id) => {
                    match self.graph.get_tree(&entry.object_id) {
                        Ok(tree) => {
                            self.stack.push(tree.entries.into_iter());
                            return Some(Ok(entry.object_id));
                        }
                        Err(e) => {
                            // The rest of this walk is abandoned.
                            self.close();
                            return Some(Err(e.into()));
                        }
                    }
                }
                Some(_) => {}
            }
        }
    }
}
