//! Per-scan configuration, resolved before a scan is opened.
//!
//! A [`ScanConfig`] comes from a TOML document or from session key/value
//! settings. A value that cannot be understood is an invalid scan context,
//! never a silent default.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};
use crate::policy::ErrorPolicy;

/// Session setting that turns on skip-policy.
pub const SKIP_ERRORS_SETTING: &str = "skip_object_errors";

/// Configuration resolved once per scan and passed to its constructor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// How object access failures are handled.
    pub error_policy: ErrorPolicy,
}

impl ScanConfig {
    pub fn new(error_policy: ErrorPolicy) -> Self {
        Self { error_policy }
    }

    /// A configuration that absorbs object access failures.
    pub fn skipping() -> Self {
        Self::new(ErrorPolicy::Skip)
    }

    /// Parse a TOML document such as `error_policy = "skip"`.
    pub fn from_toml_str(text: &str) -> ScanResult<Self> {
        toml::from_str(text).map_err(|e| ScanError::InvalidScanContext(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ScanResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScanError::InvalidScanContext(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve from session-style key/value settings.
    ///
    /// Only [`SKIP_ERRORS_SETTING`] is consulted. When it is absent the
    /// policy is strict; when it is present but not a boolean the context
    /// is invalid.
    pub fn from_settings(settings: &BTreeMap<String, String>) -> ScanResult<Self> {
        let Some(value) = settings.get(SKIP_ERRORS_SETTING) else {
            return Ok(Self::default());
        };
        let skip = parse_flag(value).ok_or_else(|| {
            ScanError::InvalidScanContext(format!(
                "{SKIP_ERRORS_SETTING} must be a boolean, got {value:?}"
            ))
        })?;
        Ok(Self::new(if skip {
            ErrorPolicy::Skip
        } else {
            ErrorPolicy::Strict
        }))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
