//! Equality-only pushdown filters.
//!
//! A [`Selector`] restricts which repositories and which commits a scan
//! visits. It is a plain value: the scan clones what it needs from it for
//! each repository and never mutates it.

use std::fmt;

use arbor_types::RepositoryId;
use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};
use crate::row::Column;

/// Columns a selector can restrict.
pub const PUSHDOWN_COLUMNS: [Column; 2] = [Column::RepositoryId, Column::CommitHash];

/// Comparison operator of a filter received from the query boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    In,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
}

impl FilterOp {
    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::In)
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "=",
            Self::In => "IN",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
        };
        f.write_str(s)
    }
}

/// `column <op> values` as handed over by a query planner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: FilterOp, values: Vec<String>) -> Self {
        Self {
            column: column.into(),
            op,
            values,
        }
    }

    /// `column = value`
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOp::Eq, vec![value.into()])
    }

    /// `column IN (values...)`
    pub fn any_of<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(column, FilterOp::In, values.into_iter().map(Into::into).collect())
    }

    /// The column this filter restricts, if a selector can evaluate it.
    pub fn pushdown_column(&self) -> Option<Column> {
        if !self.op.is_equality() {
            return None;
        }
        Column::from_name(&self.column).filter(|c| PUSHDOWN_COLUMNS.contains(c))
    }
}

/// Repository and commit restrictions for one scan.
///
/// An empty list means "no restriction" on that column. A selector built
/// from contradictory filters is unsatisfiable and admits nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    repositories: Vec<String>,
    commits: Vec<String>,
    unsatisfiable: bool,
}

impl Selector {
    /// A selector that restricts nothing.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_repositories<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repositories = dedup(ids.into_iter().map(Into::into));
        self
    }

    /// Restrict to the given commit hashes, visited in the given order.
    pub fn with_commits<I, S>(mut self, hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commits = dedup(hashes.into_iter().map(|h| normalize_hash(h.into())));
        self
    }

    /// Build a selector from pushed-down filters.
    ///
    /// Filters on the same column are combined with AND. Any filter that is
    /// not an equality on a pushdown column is rejected.
    pub fn from_filters(filters: &[Filter]) -> ScanResult<Self> {
        let mut repositories: Option<Vec<String>> = None;
        let mut commits: Option<Vec<String>> = None;

        for filter in filters {
            let column = filter
                .pushdown_column()
                .ok_or_else(|| ScanError::SelectorUnsupported {
                    column: filter.column.clone(),
                    op: filter.op.to_string(),
                })?;
            let (slot, values) = if column == Column::RepositoryId {
                (&mut repositories, dedup(filter.values.iter().cloned()))
            } else {
                (
                    &mut commits,
                    dedup(filter.values.iter().cloned().map(normalize_hash)),
                )
            };
            *slot = Some(match slot.take() {
                None => values,
                Some(current) => current.into_iter().filter(|v| values.contains(v)).collect(),
            });
        }

        let unsatisfiable = [&repositories, &commits]
            .iter()
            .any(|slot| matches!(slot, Some(values) if values.is_empty()));

        Ok(Self {
            repositories: repositories.unwrap_or_default(),
            commits: commits.unwrap_or_default(),
            unsatisfiable,
        })
    }

    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    pub fn commit_hashes(&self) -> &[String] {
        &self.commits
    }

    pub fn is_unsatisfiable(&self) -> bool {
        self.unsatisfiable
    }

    /// Whether rows of `repository` can pass this selector.
    pub fn admits_repository(&self, repository: &RepositoryId) -> bool {
        !self.unsatisfiable
            && (self.repositories.is_empty()
                || self.repositories.iter().any(|r| r == repository.as_str()))
    }
}

fn normalize_hash(hash: String) -> String {
    hash.trim().to_ascii_lowercase()
}

fn dedup(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}
