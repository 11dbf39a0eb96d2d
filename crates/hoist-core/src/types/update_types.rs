//! Update workflow data model
//!
//! These types flow between the version oracle, the requirement checks,
//! the compatibility evaluator and the deactivation step runner.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Information about the latest available release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    /// Target version (without the `v` tag prefix)
    pub version: String,

    /// Release title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Release notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,

    /// Release date (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    /// Extension version requirements at the target version
    ///
    /// Keyed by extension identifier, values are semver requirements
    /// such as `^2.1.0`. An extension without an entry has no known
    /// compatibility data.
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

impl UpdateInfo {
    /// Create update info for a target version with no compatibility data
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            title: None,
            changelog: None,
            release_date: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Attach an extension version requirement
    pub fn with_requirement(mut self, extension: impl Into<String>, req: impl Into<String>) -> Self {
        self.extensions.insert(extension.into(), req.into());
        self
    }
}

/// Outcome of a single environment requirement check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementCheckResult {
    /// Check name (e.g. `writableCheck`)
    pub name: String,

    /// Whether the requirement is met
    pub passed: bool,

    /// Human-readable details
    pub details: String,
}

impl RequirementCheckResult {
    /// A passing result
    pub fn pass(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            details: details.into(),
        }
    }

    /// A failing result
    pub fn fail(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            details: details.into(),
        }
    }
}

/// Compatibility of an installed extension with the target version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityStatus {
    Compatible,
    Incompatible,
    /// No compatibility data exists for the target version
    Unknown,
}

impl fmt::Display for CompatibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compatible => write!(f, "compatible"),
            Self::Incompatible => write!(f, "incompatible"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// An installed extension classified against the target version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRecord {
    /// Extension identifier
    pub identifier: String,

    /// Installed version
    pub installed_version: String,

    /// Whether the extension is currently active
    pub currently_active: bool,

    /// Compatibility with the target version
    pub compatibility_status: CompatibilityStatus,
}

/// Selects which compatibility statuses are deactivated during an update
///
/// Must stay constant across every call of one deactivation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeactivationFilter {
    /// Deactivate extensions known to be incompatible
    #[default]
    NotCompatible,
    /// Deactivate everything not confirmed compatible
    Unknown,
    /// Deactivate every extension
    All,
}

impl DeactivationFilter {
    /// Whether an extension with the given status is eligible for deactivation
    pub fn matches(&self, status: CompatibilityStatus) -> bool {
        match self {
            Self::NotCompatible => status == CompatibilityStatus::Incompatible,
            Self::Unknown => status != CompatibilityStatus::Compatible,
            Self::All => true,
        }
    }

    /// Wire name of the filter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotCompatible => "notCompatible",
            Self::Unknown => "unknown",
            Self::All => "all",
        }
    }
}

impl fmt::Display for DeactivationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeactivationFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notCompatible" | "not-compatible" => Ok(Self::NotCompatible),
            "unknown" => Ok(Self::Unknown),
            "all" => Ok(Self::All),
            other => Err(Error::invalid_filter(other)),
        }
    }
}

/// Result of one deactivation batch
///
/// `offset <= total` always holds, and `offset == total` exactly when the
/// outcome is `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum StepOutcome {
    /// More batches remain; call again with `offset`
    InProgress { offset: usize, total: usize },
    /// Every selected extension has been processed
    Finished { offset: usize, total: usize },
}

impl StepOutcome {
    /// Build the outcome for a batch that advanced to `offset`
    pub fn after_batch(offset: usize, total: usize) -> Self {
        if offset < total {
            Self::InProgress { offset, total }
        } else {
            Self::Finished {
                offset: total,
                total,
            }
        }
    }

    /// Offset to supply on the next call
    pub fn offset(&self) -> usize {
        match self {
            Self::InProgress { offset, .. } | Self::Finished { offset, .. } => *offset,
        }
    }

    /// Number of extensions selected for the sequence
    pub fn total(&self) -> usize {
        match self {
            Self::InProgress { total, .. } | Self::Finished { total, .. } => *total,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }
}

/// Wire form of a [`StepOutcome`] returned to polling clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResponse {
    /// True while more batches remain
    pub valid: bool,
    pub offset: usize,
    pub total: usize,
    pub success: bool,
}

impl From<StepOutcome> for StepResponse {
    fn from(outcome: StepOutcome) -> Self {
        Self {
            valid: !outcome.is_finished(),
            offset: outcome.offset(),
            total: outcome.total(),
            success: true,
        }
    }
}
