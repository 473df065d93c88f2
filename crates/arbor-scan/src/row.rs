//! Output shape of a commit-trees scan.

use std::fmt;

use arbor_types::{ObjectId, RepositoryId};
use serde::{Deserialize, Serialize};

/// Name under which the scan is exposed as a table.
pub const TABLE_NAME: &str = "commit_trees";

/// One column of the fixed output schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    RepositoryId,
    CommitHash,
    TreeHash,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RepositoryId => "repository_id",
            Self::CommitHash => "commit_hash",
            Self::TreeHash => "tree_hash",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        SCHEMA.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All columns, in output order. Every column is non-null text.
pub const SCHEMA: [Column; 3] = [Column::RepositoryId, Column::CommitHash, Column::TreeHash];

/// A commit paired with one tree reachable from it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row {
    pub repository_id: String,
    pub commit_hash: String,
    pub tree_hash: String,
}

impl Row {
    pub fn new(repository: &RepositoryId, commit: &ObjectId, tree: &ObjectId) -> Self {
        Self {
            repository_id: repository.to_string(),
            commit_hash: commit.to_hex(),
            tree_hash: tree.to_hex(),
        }
    }

    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::RepositoryId => &self.repository_id,
            Column::CommitHash => &self.commit_hash,
            Column::TreeHash => &self.tree_hash,
        }
    }

    /// Values in [`SCHEMA`] order.
    pub fn into_values(self) -> [String; 3] {
        [self.repository_id, self.commit_hash, self.tree_hash]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_order_and_names() {
        let names: Vec<_> = SCHEMA.iter().map(Column::name).collect();
        assert_eq!(names, ["repository_id", "commit_hash", "tree_hash"]);
        assert_eq!(Column::from_name("tree_hash"), Some(Column::TreeHash));
        assert_eq!(Column::from_name("blob_hash"), None);
    }

    #[test]
    fn row_renders_hashes_as_hex() {
        let repo = RepositoryId::new("r1").unwrap();
        let commit = ObjectId::from_bytes(b"c");
        let tree = ObjectId::from_bytes(b"t");
        let row = Row::new(&repo, &commit, &tree);

        assert_eq!(row.get(Column::RepositoryId), "r1");
        assert_eq!(row.get(Column::CommitHash), commit.to_hex());
        assert_eq!(
            row.into_values(),
            ["r1".to_string(), commit.to_hex(), tree.to_hex()]
        );
    }
}
