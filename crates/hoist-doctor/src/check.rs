//! Parallel requirement checking
//!
//! Each [`RequirementCheck`] is independent and order-insensitive. The
//! checker runs them concurrently and reports results in registration order.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use hoist_core::types::{RequirementCheckResult, RequirementsConfig};
use tracing::{debug, warn};

use crate::license::{LicenseCheck, LicenseFileProbe};
use crate::writable::WritableCheck;

/// A single environment requirement
#[async_trait]
pub trait RequirementCheck: Send + Sync {
    /// Stable check name reported in results
    fn name(&self) -> &'static str;

    /// Run the check
    ///
    /// Implementations report problems as a failing result rather than an
    /// error so that one check never prevents another from running.
    async fn check(&self) -> RequirementCheckResult;
}

/// Runs every registered requirement check
pub struct RequirementsChecker {
    checks: Vec<Box<dyn RequirementCheck>>,

    /// Timeout for each check
    timeout: Duration,
}

impl RequirementsChecker {
    /// Create a checker with no checks and the default timeout
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Create the standard checker: writable paths, then license
    pub fn from_config(config: &RequirementsConfig) -> Self {
        Self::new()
            .with_check(WritableCheck::new(config.writable_paths.clone()))
            .with_check(LicenseCheck::new(LicenseFileProbe::new(
                config.license_file.clone(),
            )))
    }

    /// Register a check
    pub fn with_check(mut self, check: impl RequirementCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Set a custom per-check timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of registered checks
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run all checks in parallel
    pub async fn run_checks(&self) -> Vec<RequirementCheckResult> {
        let futures: Vec<_> = self
            .checks
            .iter()
            .map(|check| self.run_one(check.as_ref()))
            .collect();

        join_all(futures).await
    }

    async fn run_one(&self, check: &dyn RequirementCheck) -> RequirementCheckResult {
        match tokio::time::timeout(self.timeout, check.check()).await {
            Ok(result) => {
                debug!("{}: passed={}", result.name, result.passed);
                result
            }
            Err(_) => {
                warn!("{} timed out after {:?}", check.name(), self.timeout);
                RequirementCheckResult::fail(
                    check.name(),
                    format!("Check timed out after {}s", self.timeout.as_secs()),
                )
            }
        }
    }
}

impl Default for RequirementsChecker {
    fn default() -> Self {
        Self::new()
    }
}
