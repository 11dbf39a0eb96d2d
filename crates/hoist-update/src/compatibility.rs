//! Extension compatibility evaluation
//!
//! Classifies each installed extension against the requirements published
//! for the target version.

use hoist_core::types::{CompatibilityStatus, ExtensionRecord, UpdateInfo};
use hoist_extensions::ExtensionSummary;
use semver::{Version, VersionReq};
use tracing::{debug, warn};

/// Evaluates installed extensions against an [`UpdateInfo`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityEvaluator;

impl CompatibilityEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Classify every installed extension, sorted by identifier
    pub fn evaluate(
        &self,
        update: &UpdateInfo,
        installed: &[ExtensionSummary],
    ) -> Vec<ExtensionRecord> {
        let mut records: Vec<ExtensionRecord> = installed
            .iter()
            .map(|ext| {
                let requirement = update.extensions.get(&ext.name).map(String::as_str);
                let status = Self::classify(&ext.name, &ext.version, requirement);
                debug!(
                    "{} {} against {}: {}",
                    ext.name,
                    ext.version,
                    requirement.unwrap_or("<none>"),
                    status
                );

                ExtensionRecord {
                    identifier: ext.name.clone(),
                    installed_version: ext.version.clone(),
                    currently_active: ext.active,
                    compatibility_status: status,
                }
            })
            .collect();

        records.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        records
    }

    /// Classify a single extension version against an optional requirement
    pub fn classify(
        name: &str,
        installed_version: &str,
        requirement: Option<&str>,
    ) -> CompatibilityStatus {
        let Some(requirement) = requirement else {
            return CompatibilityStatus::Unknown;
        };

        let req = match VersionReq::parse(requirement) {
            Ok(req) => req,
            Err(e) => {
                warn!("Invalid version requirement for {}: {} ({})", name, requirement, e);
                return CompatibilityStatus::Unknown;
            }
        };

        let version = Version::parse(installed_version).unwrap_or_else(|_| {
            warn!(
                "Unparseable installed version for {}: {}, treating as 0.0.0",
                name, installed_version
            );
            Version::new(0, 0, 0)
        });

        if req.matches(&version) {
            CompatibilityStatus::Compatible
        } else {
            CompatibilityStatus::Incompatible
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            CompatibilityEvaluator::classify("a", "2.1.0", Some("^2.0.0")),
            CompatibilityStatus::Compatible
        );
        assert_eq!(
            CompatibilityEvaluator::classify("a", "1.9.0", Some("^2.0.0")),
            CompatibilityStatus::Incompatible
        );
        assert_eq!(
            CompatibilityEvaluator::classify("a", "2.1.0", None),
            CompatibilityStatus::Unknown
        );
        assert_eq!(
            CompatibilityEvaluator::classify("a", "2.1.0", Some("not a req")),
            CompatibilityStatus::Unknown
        );
    }

    #[test]
    fn test_unparseable_installed_version_is_zero() {
        assert_eq!(
            CompatibilityEvaluator::classify("a", "dev-main", Some(">=0.0.0")),
            CompatibilityStatus::Compatible
        );
        assert_eq!(
            CompatibilityEvaluator::classify("a", "dev-main", Some("^1.0.0")),
            CompatibilityStatus::Incompatible
        );
    }

    #[test]
    fn test_evaluate_sorted_and_keeps_active_flag() {
        let update = UpdateInfo::new("2.0.0")
            .with_requirement("zeta", "^1.0.0")
            .with_requirement("alpha", "^3.0.0");
        let installed = vec![
            ExtensionSummary::new("zeta", "1.2.0", false),
            ExtensionSummary::new("alpha", "2.0.0", true),
            ExtensionSummary::new("mid", "1.0.0", true),
        ];

        let records = CompatibilityEvaluator::new().evaluate(&update, &installed);
        let ids: Vec<&str> = records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
        assert_eq!(records[0].compatibility_status, CompatibilityStatus::Incompatible);
        assert_eq!(records[1].compatibility_status, CompatibilityStatus::Unknown);
        assert_eq!(records[2].compatibility_status, CompatibilityStatus::Compatible);
        assert!(!records[2].currently_active);
    }
}
