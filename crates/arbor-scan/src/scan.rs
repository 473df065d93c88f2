//! The row stream over every repository of a catalog.

use std::slice;

use tracing::debug;

use crate::catalog::{Catalog, Repository};
use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::policy::ErrorPolicy;
use crate::repo_scan::RepositoryScan;
use crate::row::Row;
use crate::selector::Selector;

/// Result of asking a scan for its next row.
#[derive(Debug)]
pub enum ScanOutcome {
    Row(Row),
    EndOfStream,
    /// The scan failed; no further rows follow.
    Failed(ScanError),
}

/// Lazy, pull-based stream of rows across repositories.
///
/// Repositories are visited in catalog order, one live [`RepositoryScan`] at
/// a time. Nothing is read until [`RowScan::advance`] is called. A scan is
/// meant for a single consumer.
pub struct RowScan<'a> {
    repositories: slice::Iter<'a, Repository>,
    selector: Selector,
    policy: ErrorPolicy,
    current: Option<RepositoryScan<'a>>,
    done: bool,
}

impl<'a> RowScan<'a> {
    pub fn open(catalog: &'a Catalog, selector: Selector, config: &ScanConfig) -> Self {
        debug!(
            repositories = catalog.len(),
            repository_filter = selector.repositories().len(),
            commit_filter = selector.commit_hashes().len(),
            policy = %config.error_policy,
            "opening commit-trees scan"
        );
        let done = selector.is_unsatisfiable();
        Self {
            repositories: catalog.repositories().iter(),
            selector,
            policy: config.error_policy,
            current: None,
            done,
        }
    }

    /// Pull the next row.
    ///
    /// After `EndOfStream` or `Failed`, every further call returns
    /// `EndOfStream`.
    pub fn advance(&mut self) -> ScanOutcome {
        if self.done {
            return ScanOutcome::EndOfStream;
        }
        loop {
            if let Some(scan) = self.current.as_mut() {
                match scan.next_row() {
                    Some(Ok(row)) => return ScanOutcome::Row(row),
                    Some(Err(e)) => {
                        self.close();
                        return ScanOutcome::Failed(e);
                    }
                    None => self.current = None,
                }
            }

            let Some(repository) = self.repositories.next() else {
                self.done = true;
                return ScanOutcome::EndOfStream;
            };
            if !self.selector.admits_repository(&repository.id) {
                debug!(repository = %repository.id, "repository filtered out by selector");
                continue;
            }
            match RepositoryScan::open(repository, self.selector.commit_hashes(), self.policy) {
                Ok(scan) => self.current = Some(scan),
                Err(e) => {
                    self.close();
                    return ScanOutcome::Failed(e);
                }
            }
        }
    }

    /// Stop the scan and release the active repository scanner.
    ///
    /// Safe to call at any point and more than once.
    pub fn close(&mut self) {
        if let Some(mut scan) = self.current.take() {
            scan.close();
        }
        self.done = true;
    }

    pub fn is_closed(&self) -> bool {
        self.done && self.current.is_none()
    }

    /// Drain the scan into a vector, stopping at the first error.
    pub fn collect_rows(self) -> ScanResult<Vec<Row>> {
        self.collect()
    }
}

impl Iterator for RowScan<'_> {
    type Item = ScanResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            ScanOutcome::Row(row) => Some(Ok(row)),
            ScanOutcome::Failed(e) => Some(Err(e)),
            ScanOutcome::EndOfStream => None,
        }
    }
}

impl std::iter::FusedIterator for RowScan<'_> {}
