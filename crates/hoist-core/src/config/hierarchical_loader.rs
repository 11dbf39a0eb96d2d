//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Runtime config (~/.hoist/hoist-runtime.yaml)
//! 3. Environment variables (HOIST_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const RUNTIME_CONFIG_FILE: &str = "hoist-runtime.yaml";
const MANIFEST_FILE: &str = "manifest.yaml";
const STATE_FILE: &str = "update-state.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a new hierarchical config loader rooted at ~/.hoist
    pub fn new() -> Result<Self> {
        let config_dir = crate::utils::get_hoist_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        let mut config = Self::load_embedded_config::<RuntimeConfig>("runtime-defaults.yaml")?;

        let runtime_config_path = self.config_dir.join(RUNTIME_CONFIG_FILE);
        if runtime_config_path.exists() {
            debug!("Loading runtime config from {}", runtime_config_path);
            config = self.load_yaml_file::<RuntimeConfig>(&runtime_config_path)?;
        }

        self.apply_env_overrides(config)
    }

    /// Resolve the extension manifest path
    pub fn manifest_path(&self, config: &RuntimeConfig) -> Utf8PathBuf {
        self.resolve(config.paths.manifest.as_deref(), MANIFEST_FILE)
    }

    /// Resolve the update state path
    pub fn state_path(&self, config: &RuntimeConfig) -> Utf8PathBuf {
        self.resolve(config.paths.state.as_deref(), STATE_FILE)
    }

    fn resolve(&self, configured: Option<&Utf8Path>, default_name: &str) -> Utf8PathBuf {
        match configured {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.config_dir.join(path),
            None => self.config_dir.join(default_name),
        }
    }

    /// Load an embedded configuration file
    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file =
            EmbeddedConfigs::get(filename).ok_or_else(|| Error::embedded_config_missing(filename))?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file and parse it
    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(&self, mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("HOIST_HTTP_TIMEOUT_SECS") {
            config.network.http_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("HOIST_HTTP_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("HOIST_API_URL") {
            config.update.api_url = val;
        }

        if let Ok(val) = env::var("HOIST_REPO_OWNER") {
            config.update.repo_owner = val;
        }

        if let Ok(val) = env::var("HOIST_REPO_NAME") {
            config.update.repo_name = val;
        }

        if let Ok(val) = env::var("HOIST_COMPATIBILITY_MATRIX_URL") {
            config.update.compatibility_matrix_url = val;
        }

        if let Ok(val) = env::var("HOIST_BATCH_SIZE") {
            let batch_size: usize = val
                .parse()
                .map_err(|_| Error::invalid_config("HOIST_BATCH_SIZE must be a valid number"))?;
            if batch_size == 0 {
                return Err(Error::invalid_config("HOIST_BATCH_SIZE must be at least 1"));
            }
            config.update.batch_size = batch_size;
        }

        if let Ok(val) = env::var("HOIST_DISABLE_UPDATE_CHECK") {
            config.update.disable_update_check = val.parse().unwrap_or(false);
        }

        if let Ok(val) = env::var("HOIST_LICENSE_FILE") {
            config.requirements.license_file = Some(Utf8PathBuf::from(val));
        }

        if config.update.batch_size == 0 {
            return Err(Error::invalid_config("update.batch-size must be at least 1"));
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_temp_loader() -> (HierarchicalConfigLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        let loader = HierarchicalConfigLoader::with_dir(config_dir);
        (loader, temp_dir)
    }

    #[test]
    #[serial]
    fn test_load_runtime_config_defaults() {
        let (loader, _temp) = create_temp_loader();
        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.update.batch_size, 50);
        assert_eq!(config.update.repo_owner, "hoist-dev");
        assert!(config.update.require_sequence_start);
    }

    #[test]
    #[serial]
    fn test_load_runtime_config_from_file() {
        let (loader, _temp) = create_temp_loader();

        let config_content = r#"
update:
  batch-size: 20
  repo-owner: "custom-owner"
  disable-update-check: true
"#;
        let config_path = loader.config_dir().join(RUNTIME_CONFIG_FILE);
        fs::write(&config_path, config_content).unwrap();

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.update.batch_size, 20);
        assert_eq!(config.update.repo_owner, "custom-owner");
        assert!(config.update.disable_update_check);
        assert_eq!(config.update.repo_name, "hoist");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("HOIST_BATCH_SIZE", "7");
        env::set_var("HOIST_REPO_OWNER", "env-owner");
        env::set_var("HOIST_DISABLE_UPDATE_CHECK", "true");

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.update.batch_size, 7);
        assert_eq!(config.update.repo_owner, "env-owner");
        assert!(config.update.disable_update_check);

        env::remove_var("HOIST_BATCH_SIZE");
        env::remove_var("HOIST_REPO_OWNER");
        env::remove_var("HOIST_DISABLE_UPDATE_CHECK");
    }

    #[test]
    #[serial]
    fn test_zero_batch_size_rejected() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("HOIST_BATCH_SIZE", "0");
        let result = loader.load_runtime_config();
        env::remove_var("HOIST_BATCH_SIZE");

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_path_resolution() {
        let (loader, _temp) = create_temp_loader();
        let mut config = RuntimeConfig::default();

        assert_eq!(
            loader.manifest_path(&config),
            loader.config_dir().join("manifest.yaml")
        );

        config.paths.state = Some(Utf8PathBuf::from("state/custom.yaml"));
        assert_eq!(
            loader.state_path(&config),
            loader.config_dir().join("state/custom.yaml")
        );

        config.paths.manifest = Some(Utf8PathBuf::from("/opt/hoist/manifest.yaml"));
        assert_eq!(
            loader.manifest_path(&config),
            Utf8PathBuf::from("/opt/hoist/manifest.yaml")
        );
    }
}
