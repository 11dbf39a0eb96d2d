//! Runtime configuration types for operational parameters
//!
//! These types define configuration that controls runtime behavior like
//! network timeouts, the release source, batch sizing and requirement probes.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Update workflow settings
    #[serde(default)]
    pub update: UpdateConfig,

    /// Environment requirement probes
    #[serde(default)]
    pub requirements: RequirementsConfig,

    /// Locations of persisted files
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!(
        "hoist/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Update workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateConfig {
    /// Releases API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Repository owner
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,

    /// Repository name
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    /// URL of the extension compatibility matrix
    #[serde(default = "default_matrix_url")]
    pub compatibility_matrix_url: String,

    /// Extensions deactivated per batch call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Skip contacting the release source entirely
    #[serde(default)]
    pub disable_update_check: bool,

    /// Reject batch calls at a non-zero offset when no sequence was started
    #[serde(default = "default_require_sequence_start")]
    pub require_sequence_start: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            compatibility_matrix_url: default_matrix_url(),
            batch_size: default_batch_size(),
            disable_update_check: false,
            require_sequence_start: default_require_sequence_start(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_repo_owner() -> String {
    "hoist-dev".to_string()
}
fn default_repo_name() -> String {
    "hoist".to_string()
}
fn default_matrix_url() -> String {
    "https://raw.githubusercontent.com/hoist-dev/hoist/main/compatibility-matrix.yaml".to_string()
}
fn default_batch_size() -> usize {
    50
}
fn default_require_sequence_start() -> bool {
    true
}

/// Environment requirement probe configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RequirementsConfig {
    /// Directories that must be writable for the update to proceed
    #[serde(default)]
    pub writable_paths: Vec<Utf8PathBuf>,

    /// License file consulted by the license check
    #[serde(default)]
    pub license_file: Option<Utf8PathBuf>,
}

/// Persisted file locations
///
/// Relative or missing paths resolve under `~/.hoist`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PathsConfig {
    /// Extension manifest
    #[serde(default)]
    pub manifest: Option<Utf8PathBuf>,

    /// Update state (deactivated extensions, sequence marker)
    #[serde(default)]
    pub state: Option<Utf8PathBuf>,
}
