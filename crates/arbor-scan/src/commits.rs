//! Which commits of one repository a scan visits.

use std::vec;

use arbor_store::{CommitGraph, CommitIter, ResolvedCommit, StoreError};
use arbor_types::ObjectId;
use tracing::warn;

use crate::catalog::Repository;
use crate::error::{ScanError, ScanResult};
use crate::policy::ErrorPolicy;

/// Stream of commits for one repository.
///
/// With explicit hashes, each hash is resolved in order; under skip-policy
/// a hash that does not resolve is dropped and the next one is tried.
/// Without hashes, the repository's full history is streamed as the store
/// enumerates it.
pub enum CommitSelection<'a> {
    ByHash {
        repository: &'a Repository,
        hashes: vec::IntoIter<String>,
        policy: ErrorPolicy,
    },
    History {
        repository: &'a Repository,
        commits: CommitIter<'a>,
    },
}

impl<'a> CommitSelection<'a> {
    pub fn select(
        repository: &'a Repository,
        hashes: &[String],
        policy: ErrorPolicy,
    ) -> ScanResult<Self> {
        if !hashes.is_empty() {
            return Ok(Self::ByHash {
                repository,
                hashes: hashes.to_vec().into_iter(),
                policy,
            });
        }
        let commits = repository
            .graph
            .list_commits()
            .map_err(|e| malformed(repository, e))?;
        Ok(Self::History {
            repository,
            commits,
        })
    }
}

impl Iterator for CommitSelection<'_> {
    type Item = ScanResult<ResolvedCommit>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::ByHash {
                repository,
                hashes,
                policy,
            } => loop {
                let hash = hashes.next()?;
                match resolve(repository.graph.as_ref(), &hash) {
                    Ok(commit) => return Some(Ok(commit)),
                    Err(e) if policy.is_skip() && e.is_skippable() => {
                        warn!(repository = %repository.id, commit = %hash, error = %e, "skipping unresolvable commit");
                    }
                    Err(e) => return Some(Err(e)),
                }
            },
            Self::History {
                repository,
                commits,
            } => commits
                .next()
                .map(|r| r.map_err(|e| malformed(repository, e))),
        }
    }
}

/// Resolve a commit hash given as text. Text that is not a valid hash can
/// never resolve, so it is reported as not found.
fn resolve(graph: &dyn CommitGraph, hash: &str) -> ScanResult<ResolvedCommit> {
    let id = ObjectId::from_hex(hash).map_err(|_| ScanError::ObjectNotFound(hash.to_string()))?;
    Ok(graph.get_commit(&id)?)
}

fn malformed(repository: &Repository, err: StoreError) -> ScanError {
    ScanError::MalformedHistory {
        repository: repository.id.clone(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn hashes(ids: &[ObjectId]) -> Vec<String> {
        ids.iter().map(ObjectId::to_hex).collect()
    }

    #[test]
    fn explicit_hashes_resolve_in_order() {
        let mut fx = Fixture::new("r1");
        let tree = fx.tree(vec![]);
        let a = fx.commit(tree, &[]);
        let b = fx.commit(tree, &[a]);
        let repo = fx.repository();

        let selection = CommitSelection::select(&repo, &hashes(&[b, a]), ErrorPolicy::Strict).unwrap();
        let ids: Vec<_> = selection.map(|c| c.unwrap().id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn skip_drops_unresolvable_hashes() {
        let mut fx = Fixture::new("r1");
        let tree = fx.tree(vec![]);
        let a = fx.commit(tree, &[]);
        let repo = fx.repository();
        let wanted = vec![
            ObjectId::from_bytes(b"ghost").to_hex(),
            "not-a-hash".to_string(),
            a.to_hex(),
        ];

        let selection = CommitSelection::select(&repo, &wanted, ErrorPolicy::Skip).unwrap();
        let ids: Vec<_> = selection.map(|c| c.unwrap().id).collect();
        assert_eq!(ids, vec![a]);
    }

    #[test]
    fn strict_reports_unresolvable_hash() {
        let mut fx = Fixture::new("r1");
        let tree = fx.tree(vec![]);
        let a = fx.commit(tree, &[]);
        let repo = fx.repository();
        let ghost = ObjectId::from_bytes(b"ghost");

        let mut selection =
            CommitSelection::select(&repo, &hashes(&[ghost, a]), ErrorPolicy::Strict).unwrap();
        let first = selection.next().unwrap().unwrap_err();
        assert!(matches!(first, ScanError::ObjectNotFound(ref h) if *h == ghost.to_hex()));
    }

    #[test]
    fn no_hashes_streams_history() {
        let mut fx = Fixture::new("r1");
        let tree = fx.tree(vec![]);
        let a = fx.commit(tree, &[]);
        let b = fx.commit(tree, &[a]);
        fx.head(b);
        let repo = fx.repository();

        let selection = CommitSelection::select(&repo, &[], ErrorPolicy::Strict).unwrap();
        let ids: Vec<_> = selection.map(|c| c.unwrap().id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn history_failures_are_malformed_history() {
        let mut fx = Fixture::new("r1");
        fx.head(ObjectId::from_bytes(b"dangling head"));
        let repo = fx.repository();

        let mut selection = CommitSelection::select(&repo, &[], ErrorPolicy::Skip).unwrap();
        let err = selection.next().unwrap().unwrap_err();
        assert!(matches!(err, ScanError::MalformedHistory { ref repository, .. } if repository.as_str() == "r1"));
        assert!(selection.next().is_none());
    }
}
