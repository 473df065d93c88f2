//! The repositories a scan can visit.

use std::sync::Arc;

use arbor_store::CommitGraph;
use arbor_types::RepositoryId;

/// A repository known to the catalog: its id and a handle to its objects.
#[derive(Clone)]
pub struct Repository {
    pub id: RepositoryId,
    pub graph: Arc<dyn CommitGraph>,
}

impl Repository {
    pub fn new(id: RepositoryId, graph: Arc<dyn CommitGraph>) -> Self {
        Self { id, graph }
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Ordered set of repositories a scan runs over.
///
/// Scans visit repositories in insertion order. Ids are unique.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    repositories: Vec<Repository>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository. Returns `false` (and keeps the existing entry)
    /// if the id is already taken.
    pub fn add(&mut self, repository: Repository) -> bool {
        if self.get(&repository.id).is_some() {
            return false;
        }
        self.repositories.push(repository);
        true
    }

    pub fn get(&self, id: &RepositoryId) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.id == *id)
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
