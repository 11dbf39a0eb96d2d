//! Release source
//!
//! The [`VersionOracle`] answers which version the platform can update to
//! and which extension versions that release supports.

use std::time::Duration;

use async_trait::async_trait;
use hoist_core::types::{CompatibilityMatrix, RuntimeConfig, UpdateConfig, UpdateInfo};
use semver::Version;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Result, UpdateError};

/// Source of update information
#[async_trait]
pub trait VersionOracle: Send + Sync {
    /// Latest available release with its extension requirements
    async fn check_for_updates(&self) -> Result<UpdateInfo>;
}

/// Oracle that always answers with the same release
#[derive(Debug, Clone)]
pub struct StaticVersionOracle {
    info: UpdateInfo,
}

impl StaticVersionOracle {
    pub fn new(info: UpdateInfo) -> Self {
        Self { info }
    }
}

#[async_trait]
impl VersionOracle for StaticVersionOracle {
    async fn check_for_updates(&self) -> Result<UpdateInfo> {
        Ok(self.info.clone())
    }
}

/// Release information
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "v6.5.0")
    pub tag_name: String,

    /// Release name
    pub name: Option<String>,

    /// Release body (changelog)
    pub body: Option<String>,

    /// Published date
    pub published_at: Option<String>,
}

impl Release {
    /// Tag without the `v` prefix
    pub fn version(&self) -> &str {
        self.tag_name.trim_start_matches('v')
    }
}

/// Release manager backed by a GitHub-compatible releases API
pub struct ReleaseManager {
    client: reqwest::Client,
    config: UpdateConfig,
}

impl ReleaseManager {
    /// Create a release manager from runtime configuration
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.network.user_agent)
            .timeout(Duration::from_secs(config.network.http_timeout_secs))
            .build()
            .map_err(|e| UpdateError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.update.clone(),
        })
    }

    /// Get latest release
    pub async fn get_latest(&self) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.config.api_url.trim_end_matches('/'),
            self.config.repo_owner,
            self.config.repo_name
        );

        debug!("Fetching latest release from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpdateError::transport(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(UpdateError::transport(format!(
                "Failed to fetch release: {}",
                response.status()
            )));
        }

        response
            .json::<Release>()
            .await
            .map_err(|e| UpdateError::transport(format!("Malformed release response: {}", e)))
    }

    /// Fetch the extension compatibility matrix
    pub async fn fetch_compatibility_matrix(&self) -> Result<CompatibilityMatrix> {
        let url = &self.config.compatibility_matrix_url;
        debug!("Fetching compatibility matrix from: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpdateError::transport(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(UpdateError::transport(format!(
                "Failed to fetch compatibility matrix: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpdateError::transport(e.to_string()))?;

        serde_yaml_ng::from_str(&body).map_err(|e| {
            UpdateError::transport(format!("Malformed compatibility matrix: {}", e))
        })
    }

    /// Combine a release and an optional matrix into update information
    pub fn to_update_info(
        release: &Release,
        matrix: Option<&CompatibilityMatrix>,
    ) -> Result<UpdateInfo> {
        let version = Version::parse(release.version())
            .map_err(|_| UpdateError::invalid_version(&release.tag_name))?;

        let extensions = matrix
            .and_then(|m| m.entry_for(&version))
            .map(|entry| entry.compatible_extensions.clone())
            .unwrap_or_default();

        Ok(UpdateInfo {
            version: version.to_string(),
            title: release.name.clone(),
            changelog: release.body.clone(),
            release_date: release.published_at.clone(),
            extensions,
        })
    }
}

#[async_trait]
impl VersionOracle for ReleaseManager {
    async fn check_for_updates(&self) -> Result<UpdateInfo> {
        let release = self.get_latest().await?;

        // Without a matrix every extension is reported as unknown
        let matrix = match self.fetch_compatibility_matrix().await {
            Ok(matrix) => Some(matrix),
            Err(e) => {
                warn!("Compatibility data unavailable: {}", e);
                None
            }
        };

        let info = Self::to_update_info(&release, matrix.as_ref())?;
        info!(
            "Latest release {} ({} extension requirement(s))",
            info.version,
            info.extensions.len()
        );
        Ok(info)
    }
}
