//! Extension activation lifecycle
//!
//! [`ExtensionLifecycle`] is the seam the update workflow uses to read the
//! installed extension set and flip active flags. The manifest-backed
//! implementation is the one the CLI wires in.

use anyhow::Result;
use std::sync::Mutex;
use tracing::info;

use crate::manifest::ManifestManager;

/// Snapshot of one installed extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSummary {
    pub name: String,
    pub version: String,
    pub active: bool,
}

impl ExtensionSummary {
    pub fn new(name: impl Into<String>, version: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            active,
        }
    }
}

/// Reads and mutates the set of active extensions
pub trait ExtensionLifecycle: Send + Sync {
    /// All installed extensions
    fn installed(&self) -> Result<Vec<ExtensionSummary>>;

    /// Deactivate an extension
    ///
    /// Returns `true` if the extension was active. Deactivating an inactive
    /// extension succeeds and returns `false`.
    fn deactivate(&self, name: &str) -> Result<bool>;

    /// Activate an extension
    ///
    /// Returns `true` if the extension was inactive.
    fn activate(&self, name: &str) -> Result<bool>;
}

/// [`ExtensionLifecycle`] backed by the on-disk manifest
pub struct ManifestLifecycle {
    manifest: Mutex<ManifestManager>,
}

impl ManifestLifecycle {
    pub fn new(manifest: ManifestManager) -> Self {
        Self {
            manifest: Mutex::new(manifest),
        }
    }

    fn with_manifest<T>(&self, f: impl FnOnce(&mut ManifestManager) -> Result<T>) -> Result<T> {
        let mut guard = self
            .manifest
            .lock()
            .map_err(|_| anyhow::anyhow!("Extension manifest lock poisoned"))?;
        f(&mut guard)
    }
}

impl ExtensionLifecycle for ManifestLifecycle {
    fn installed(&self) -> Result<Vec<ExtensionSummary>> {
        self.with_manifest(|manifest| {
            Ok(manifest
                .list_all()
                .into_iter()
                .map(|(name, ext)| ExtensionSummary::new(name, &ext.version, ext.active))
                .collect())
        })
    }

    fn deactivate(&self, name: &str) -> Result<bool> {
        let changed = self.with_manifest(|manifest| manifest.set_active(name, false))?;
        if changed {
            info!("Deactivated extension {}", name);
        }
        Ok(changed)
    }

    fn activate(&self, name: &str) -> Result<bool> {
        let changed = self.with_manifest(|manifest| manifest.set_active(name, true))?;
        if changed {
            info!("Activated extension {}", name);
        }
        Ok(changed)
    }
}
