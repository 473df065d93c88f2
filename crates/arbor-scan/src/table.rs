//! The `commit_trees` table as seen by a query engine.

use crate::catalog::Catalog;
use crate::config::ScanConfig;
use crate::error::ScanResult;
use crate::row::{Column, SCHEMA, TABLE_NAME};
use crate::scan::RowScan;
use crate::selector::{Filter, Selector};

/// A table that can produce its rows as a lazy scan.
pub trait RowSource {
    fn name(&self) -> &str;

    /// Output columns, in row order.
    fn schema(&self) -> &[Column];

    /// Scan every row.
    fn rows(&self, config: &ScanConfig) -> RowScan<'_>;
}

/// A table that can evaluate some filters itself.
///
/// The engine offers its filters to [`Pushdown::handled_filters`] and passes
/// the accepted ones to [`Pushdown::rows_with_filters`]. Rows still satisfy
/// every accepted filter; the engine evaluates the rest.
pub trait Pushdown: RowSource {
    fn handled_filters(&self, filters: &[Filter]) -> Vec<Filter>;

    fn rows_with_filters(&self, config: &ScanConfig, filters: &[Filter]) -> ScanResult<RowScan<'_>>;
}

/// Commit/tree pairs of every repository in a catalog.
#[derive(Clone, Debug)]
pub struct CommitTreesTable {
    catalog: Catalog,
}

impl CommitTreesTable {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl RowSource for CommitTreesTable {
    fn name(&self) -> &str {
        TABLE_NAME
    }

    fn schema(&self) -> &[Column] {
        &SCHEMA
    }

    fn rows(&self, config: &ScanConfig) -> RowScan<'_> {
        RowScan::open(&self.catalog, Selector::all(), config)
    }
}

impl Pushdown for CommitTreesTable {
    fn handled_filters(&self, filters: &[Filter]) -> Vec<Filter> {
        filters
            .iter()
            .filter(|f| f.pushdown_column().is_some())
            .cloned()
            .collect()
    }

    /// Fails with `SelectorUnsupported` if any filter is one
    /// [`Pushdown::handled_filters`] would have declined.
    fn rows_with_filters(&self, config: &ScanConfig, filters: &[Filter]) -> ScanResult<RowScan<'_>> {
        let selector = Selector::from_filters(filters)?;
        Ok(RowScan::open(&self.catalog, selector, config))
    }
}
