//! Lazy `commit_trees` scans across many repositories.
//!
//! A scan produces one row per (repository, commit, tree) where the tree is
//! the commit's root tree or a directory reachable from it. Rows are pulled
//! one at a time: at most one commit stream and one tree walk are open at
//! any moment, whatever the size of the catalog.
//!
//! # Layers
//!
//! - [`RowScan`] -- the row stream over a [`Catalog`], driven by a [`Selector`]
//! - [`RepositoryScan`] -- one repository: commit selection joined with tree walks
//! - [`TreeWalker`] -- depth-first, deduplicated directories of one commit
//! - [`CommitTreesTable`] -- the scan behind the [`RowSource`] and [`Pushdown`] traits
//!
//! # Failures
//!
//! Missing or unreadable objects either abort the scan or are skipped,
//! according to the [`ErrorPolicy`] in the [`ScanConfig`].
//!
//! ```ignore
//! let table = CommitTreesTable::new(catalog);
//! let filters = [Filter::eq("repository_id", "r1")];
//! for row in table.rows_with_filters(&ScanConfig::skipping(), &filters)? {
//!     let row = row?;
//!     println!("{} {} {}", row.repository_id, row.commit_hash, row.tree_hash);
//! }
//! ```

pub mod catalog;
pub mod commits;
pub mod config;
pub mod error;
pub mod policy;
pub mod repo_scan;
pub mod row;
pub mod scan;
pub mod selector;
pub mod table;
pub mod walker;

#[cfg(test)]
mod testing;

pub use catalog::{Catalog, Repository};
pub use commits::CommitSelection;
pub use config::{ScanConfig, SKIP_ERRORS_SETTING};
pub use error::{ScanError, ScanResult};
pub use policy::ErrorPolicy;
pub use repo_scan::RepositoryScan;
pub use row::{Column, Row, SCHEMA, TABLE_NAME};
pub use scan::{RowScan, ScanOutcome};
pub use selector::{Filter, FilterOp, Selector, PUSHDOWN_COLUMNS};
pub use table::{CommitTreesTable, Pushdown, RowSource};
pub use walker::TreeWalker;
