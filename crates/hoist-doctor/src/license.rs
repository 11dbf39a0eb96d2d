//! License validity check

use anyhow::{Context, Result};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use hoist_core::types::RequirementCheckResult;
use serde::{Deserialize, Serialize};

use crate::check::RequirementCheck;

const CHECK_NAME: &str = "licenseCheck";

/// Result of probing the installation license
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseStatus {
    Valid {
        holder: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    },
    Expired {
        expired_at: DateTime<Utc>,
    },
    Invalid {
        reason: String,
    },
    Missing,
}

/// Source of license information
#[async_trait]
pub trait LicenseProbe: Send + Sync {
    async fn probe(&self) -> Result<LicenseStatus>;
}

/// On-disk license file
///
/// ```yaml
/// key: "HST-1234-ABCD"
/// holder: "Example Corp"
/// expires_at: "2027-01-01T00:00:00Z"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseFile {
    pub key: String,

    #[serde(default)]
    pub holder: Option<String>,

    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Reads the license from a YAML file
pub struct LicenseFileProbe {
    path: Option<Utf8PathBuf>,
}

impl LicenseFileProbe {
    pub fn new(path: Option<Utf8PathBuf>) -> Self {
        Self { path }
    }

    fn evaluate(license: LicenseFile, now: DateTime<Utc>) -> LicenseStatus {
        if license.key.trim().is_empty() {
            return LicenseStatus::Invalid {
                reason: "license key is empty".to_string(),
            };
        }

        match license.expires_at {
            Some(expired_at) if expired_at <= now => LicenseStatus::Expired { expired_at },
            expires_at => LicenseStatus::Valid {
                holder: license.holder,
                expires_at,
            },
        }
    }
}

#[async_trait]
impl LicenseProbe for LicenseFileProbe {
    async fn probe(&self) -> Result<LicenseStatus> {
        let Some(path) = &self.path else {
            return Ok(LicenseStatus::Missing);
        };

        if !path.exists() {
            return Ok(LicenseStatus::Missing);
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read license file {}", path))?;

        let license: LicenseFile = match serde_yaml_ng::from_str(&content) {
            Ok(license) => license,
            Err(e) => {
                return Ok(LicenseStatus::Invalid {
                    reason: format!("unreadable license file: {}", e),
                })
            }
        };

        Ok(Self::evaluate(license, Utc::now()))
    }
}

/// Verifies that a valid license is installed
pub struct LicenseCheck {
    probe: Box<dyn LicenseProbe>,
}

impl LicenseCheck {
    pub fn new(probe: impl LicenseProbe + 'static) -> Self {
        Self {
            probe: Box::new(probe),
        }
    }
}

#[async_trait]
impl RequirementCheck for LicenseCheck {
    fn name(&self) -> &'static str {
        CHECK_NAME
    }

    async fn check(&self) -> RequirementCheckResult {
        match self.probe.probe().await {
            Ok(LicenseStatus::Valid { holder, expires_at }) => {
                let mut details = "License valid".to_string();
                if let Some(holder) = holder {
                    details.push_str(&format!(" for {}", holder));
                }
                if let Some(expires_at) = expires_at {
                    details.push_str(&format!(" until {}", expires_at.format("%Y-%m-%d")));
                }
                RequirementCheckResult::pass(CHECK_NAME, details)
            }
            Ok(LicenseStatus::Expired { expired_at }) => RequirementCheckResult::fail(
                CHECK_NAME,
                format!("License expired on {}", expired_at.format("%Y-%m-%d")),
            ),
            Ok(LicenseStatus::Invalid { reason }) => {
                RequirementCheckResult::fail(CHECK_NAME, format!("License invalid: {}", reason))
            }
            Ok(LicenseStatus::Missing) => {
                RequirementCheckResult::fail(CHECK_NAME, "No license installed")
            }
            Err(e) => RequirementCheckResult::fail(CHECK_NAME, format!("{:#}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn write_license(temp: &TempDir, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(temp.path().join("license.yaml")).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_evaluate_expiry() {
        let now = Utc::now();
        let license = LicenseFile {
            key: "HST-1".to_string(),
            holder: None,
            expires_at: Some(now - Duration::days(1)),
        };
        assert!(matches!(
            LicenseFileProbe::evaluate(license, now),
            LicenseStatus::Expired { .. }
        ));

        let license = LicenseFile {
            key: "HST-1".to_string(),
            holder: None,
            expires_at: None,
        };
        assert!(matches!(
            LicenseFileProbe::evaluate(license, now),
            LicenseStatus::Valid { .. }
        ));
    }

    #[tokio::test]
    async fn test_valid_license_file() {
        let temp = TempDir::new().unwrap();
        let path = write_license(
            &temp,
            "key: \"HST-1234\"\nholder: \"Example Corp\"\nexpires_at: \"2999-01-01T00:00:00Z\"\n",
        );

        let result = LicenseCheck::new(LicenseFileProbe::new(Some(path)))
            .check()
            .await;
        assert!(result.passed, "{}", result.details);
        assert!(result.details.contains("Example Corp"));
    }

    #[tokio::test]
    async fn test_empty_key_fails() {
        let temp = TempDir::new().unwrap();
        let path = write_license(&temp, "key: \"\"\n");

        let result = LicenseCheck::new(LicenseFileProbe::new(Some(path)))
            .check()
            .await;
        assert!(!result.passed);
        assert!(result.details.contains("empty"));
    }

    #[tokio::test]
    async fn test_missing_license() {
        let result = LicenseCheck::new(LicenseFileProbe::new(None)).check().await;
        assert!(!result.passed);
        assert_eq!(result.name, "licenseCheck");
    }
}
