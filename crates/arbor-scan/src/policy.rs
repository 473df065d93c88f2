//! Fault-tolerance policy for object access failures.

use std::fmt;
use std::str::FromStr;

use arbor_types::RepositoryId;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ScanError, ScanResult};

/// What a scan does when a commit or tree cannot be read.
///
/// Resolved once per scan. Under [`ErrorPolicy::Skip`] a failure is
/// absorbed at the narrowest scope that contains it (one hash, one commit,
/// the rest of one tree walk) and the scan continues. Under
/// [`ErrorPolicy::Strict`] the first failure ends the scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    #[default]
    Strict,
    Skip,
}

impl ErrorPolicy {
    pub fn is_skip(self) -> bool {
        matches!(self, Self::Skip)
    }

    /// Either swallow `err` (returning `Ok`) or hand it back for propagation.
    ///
    /// Non-skippable errors are always handed back.
    pub fn absorb(self, repository: &RepositoryId, err: ScanError) -> ScanResult<()> {
        if self.is_skip() && err.is_skippable() {
            warn!(repository = %repository, error = %err, "skipping unreadable object");
            Ok(())
        } else {
            Err(err)
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "skip" => Ok(Self::Skip),
            other => Err(ScanError::InvalidScanContext(format!(
                "unknown error policy {other:?}"
            ))),
        }
    }
}
