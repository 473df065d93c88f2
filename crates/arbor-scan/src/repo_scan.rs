//! Per-repository scanner: commit selection joined with tree walks.
//!
//! States and transitions:
//!
//! ```text
//! AwaitingCommit --commit + root tree--> WalkingTree --tree--> WalkingTree
//!       ^                                    |
//!       +------------walk exhausted----------+
//! AwaitingCommit --commits exhausted--> Exhausted
//! any --unabsorbed error--> Failed
//! ```

use arbor_types::ObjectId;
use tracing::debug;

use crate::catalog::Repository;
use crate::commits::CommitSelection;
use crate::error::{ScanError, ScanResult};
use crate::policy::ErrorPolicy;
use crate::row::Row;
use crate::walker::TreeWalker;

enum ScanState<'a> {
    AwaitingCommit,
    WalkingTree(TreeWalker<'a>),
    Exhausted,
    Failed,
}

/// Live scanner over one repository.
pub struct RepositoryScan<'a> {
    repository: &'a Repository,
    policy: ErrorPolicy,
    commits: Option<CommitSelection<'a>>,
    state: ScanState<'a>,
}

impl<'a> RepositoryScan<'a> {
    /// Open a scanner over `repository`, restricted to `commit_hashes` when
    /// that list is non-empty.
    ///
    /// If the history cannot be opened, skip-policy yields a scanner with no
    /// rows; strict-policy returns the error.
    pub fn open(
        repository: &'a Repository,
        commit_hashes: &[String],
        policy: ErrorPolicy,
    ) -> ScanResult<Self> {
        debug!(
            repository = %repository.id,
            commits = commit_hashes.len(),
            "opening repository scan"
        );
        let (commits, state) = match CommitSelection::select(repository, commit_hashes, policy) {
            Ok(selection) => (Some(selection), ScanState::AwaitingCommit),
            Err(e) => {
                policy.absorb(&repository.id, e)?;
                (None, ScanState::Exhausted)
            }
        };
        Ok(Self {
            repository,
            policy,
            commits,
            state,
        })
    }

    /// Next row, `None` once exhausted or failed.
    pub fn next_row(&mut self) -> Option<ScanResult<Row>> {
        loop {
            match &mut self.state {
                ScanState::Exhausted | ScanState::Failed => return None,
                ScanState::AwaitingCommit => {
                    let Some(commits) = self.commits.as_mut() else {
                        self.state = ScanState::Exhausted;
                        return None;
                    };
                    match commits.next() {
                        None => {
                            self.close();
                            return None;
                        }
                        Some(Err(e)) => {
                            if let Err(e) = self.absorb(e) {
                                return Some(Err(e));
                            }
                        }
                        Some(Ok(commit)) => {
                            let repository = self.repository;
                            match TreeWalker::new(repository.graph.as_ref(), &commit) {
                                Ok(walker) => self.state = ScanState::WalkingTree(walker),
                                Err(e) => {
                                    if let Err(e) = self.absorb(e) {
                                        return Some(Err(e));
                                    }
                                }
                            }
                        }
                    }
                }
                ScanState::WalkingTree(walker) => {
                    let commit = walker.commit();
                    match walker.next() {
                        Some(Ok(tree)) => return Some(Ok(self.row(&commit, &tree))),
                        Some(Err(e)) => {
                            self.state = ScanState::AwaitingCommit;
                            if let Err(e) = self.absorb(e) {
                                return Some(Err(e));
                            }
                        }
                        None => self.state = ScanState::AwaitingCommit,
                    }
                }
            }
        }
    }

    /// Release the commit stream and the active tree walk. Safe to call
    /// more than once; a failed scanner stays failed.
    pub fn close(&mut self) {
        if let ScanState::WalkingTree(walker) = &mut self.state {
            walker.close();
        }
        self.commits = None;
        if !matches!(self.state, ScanState::Failed) {
            self.state = ScanState::Exhausted;
        }
    }

    /// Whether the scanner holds no open commit stream or tree walk.
    pub fn is_closed(&self) -> bool {
        self.commits.is_none() && !matches!(self.state, ScanState::WalkingTree(_))
    }

    fn row(&self, commit: &ObjectId, tree: &ObjectId) -> Row {
        Row::new(&self.repository.id, commit, tree)
    }

    /// Apply the error policy; on propagation the scanner becomes terminal.
    fn absorb(&mut self, err: ScanError) -> ScanResult<()> {
        self.policy.absorb(&self.repository.id, err).inspect_err(|_| {
            self.close();
            self.state = ScanState::Failed;
        })
    }
}

impl Drop for RepositoryScan<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
