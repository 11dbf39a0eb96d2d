//! Wiring of configuration, manifest and update controller

use std::sync::Arc;

use anyhow::{Context, Result};
use camino::Utf8Path;
use hoist_core::config::HierarchicalConfigLoader;
use hoist_core::types::RuntimeConfig;
use hoist_doctor::RequirementsChecker;
use hoist_extensions::{ManifestLifecycle, ManifestManager};
use hoist_update::{
    ControllerSettings, PhaseEventBus, ReleaseManager, RuntimeHandle, TracingHandler,
    UpdateController, UpdateStateStore, VERSION,
};
use semver::Version;
use tracing::debug;

/// Resolved configuration for one CLI invocation
pub struct AppContext {
    loader: HierarchicalConfigLoader,
    pub config: RuntimeConfig,
}

impl AppContext {
    /// Load configuration from `config_dir` or ~/.hoist
    pub fn load(config_dir: Option<&Utf8Path>) -> Result<Self> {
        let loader = match config_dir {
            Some(dir) => HierarchicalConfigLoader::with_dir(dir.to_path_buf()),
            None => HierarchicalConfigLoader::new()?,
        };
        let config = loader.load_runtime_config()?;
        debug!("Using configuration directory {}", loader.config_dir());

        Ok(Self { loader, config })
    }

    pub fn manifest(&self) -> Result<ManifestManager> {
        ManifestManager::new(self.loader.manifest_path(&self.config))
    }

    pub fn state_store(&self) -> Result<UpdateStateStore> {
        UpdateStateStore::open(self.loader.state_path(&self.config))
    }

    /// Build the controller over the local manifest and release source
    pub fn controller(&self) -> Result<UpdateController> {
        let current = Version::parse(VERSION).context("Invalid build version")?;
        let manifest = self.manifest()?;

        let loaded: Vec<String> = manifest
            .list_all()
            .into_iter()
            .filter(|(_, ext)| ext.active)
            .map(|(name, _)| name.to_string())
            .collect();

        let mut events = PhaseEventBus::new();
        events.register_core(TracingHandler);

        let controller = UpdateController::new(
            current,
            Arc::new(ReleaseManager::new(&self.config)?),
            Arc::new(ManifestLifecycle::new(manifest)),
            RuntimeHandle::new(loaded, events),
        )
        .with_requirements(RequirementsChecker::from_config(&self.config.requirements))
        .with_state_store(self.state_store()?)
        .with_settings(ControllerSettings::from(&self.config.update));

        Ok(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_config_dir() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        std::fs::write(
            dir.join("hoist-runtime.yaml"),
            "update:\n  batch-size: 7\n",
        )
        .unwrap();

        let ctx = AppContext::load(Some(&dir)).unwrap();
        assert_eq!(ctx.config.update.batch_size, 7);

        let manifest = ctx.manifest().unwrap();
        assert_eq!(manifest.path(), dir.join("manifest.yaml").as_path());
    }

    #[test]
    fn test_controller_uses_configured_settings() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        std::fs::write(
            dir.join("hoist-runtime.yaml"),
            "update:\n  batch-size: 3\n  disable-update-check: true\n",
        )
        .unwrap();

        let controller = AppContext::load(Some(&dir)).unwrap().controller().unwrap();
        assert_eq!(controller.settings().batch_size, 3);
        assert!(controller.settings().disable_update_check);
        assert_eq!(controller.runtime().events().len(), 1);
    }
}
