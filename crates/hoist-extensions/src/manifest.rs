//! Local installation manifest management
//!
//! The manifest tracks which extensions are installed locally, their
//! versions, and whether the runtime loads them. Located at
//! ~/.hoist/manifest.yaml by default:
//!
//! ```yaml
//! schema_version: "1.0"
//! last_updated: "2026-01-21T10:00:00Z"
//! extensions:
//!   payments:
//!     version: "3.2.0"
//!     installed_at: "2026-01-20T15:30:00Z"
//!     source: "registry"
//!     active: true
//! ```

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use hoist_core::types::{InstallManifest, InstalledExtension};
use tracing::{debug, info};

/// Manifest manager for tracking installed extensions
pub struct ManifestManager {
    /// Path to manifest file
    manifest_path: Utf8PathBuf,

    /// Current manifest data
    manifest: InstallManifest,
}

impl ManifestManager {
    /// Open the manifest at `manifest_path`
    ///
    /// Creates the manifest file if it doesn't exist.
    pub fn new(manifest_path: Utf8PathBuf) -> Result<Self> {
        debug!("Loading manifest from: {}", manifest_path);

        let manifest = if manifest_path.exists() {
            Self::load_manifest(&manifest_path)?
        } else {
            info!("Creating new manifest at: {}", manifest_path);
            let manifest = InstallManifest::default();
            Self::ensure_parent_dir(&manifest_path)?;
            Self::save_manifest(&manifest_path, &manifest)?;
            manifest
        };

        Ok(Self {
            manifest_path,
            manifest,
        })
    }

    fn ensure_parent_dir(path: &Utf8Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent))?;
        }
        Ok(())
    }

    fn load_manifest(path: &Utf8Path) -> Result<InstallManifest> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path))?;
        let manifest: InstallManifest = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse manifest {}", path))?;
        debug!(
            "Loaded manifest with {} extensions",
            manifest.extensions.len()
        );
        Ok(manifest)
    }

    fn save_manifest(path: &Utf8Path, manifest: &InstallManifest) -> Result<()> {
        let content = serde_yaml_ng::to_string(manifest)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write manifest {}", path))?;
        Ok(())
    }

    /// Save current manifest to disk
    pub fn save(&mut self) -> Result<()> {
        self.manifest.last_updated = Utc::now();
        Self::save_manifest(&self.manifest_path, &self.manifest)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Utf8Path {
        &self.manifest_path
    }

    /// Get installed extension info
    pub fn get(&self, name: &str) -> Option<&InstalledExtension> {
        self.manifest.extensions.get(name)
    }

    /// Check if an extension is installed and active
    pub fn is_active(&self, name: &str) -> bool {
        self.manifest
            .extensions
            .get(name)
            .map(|ext| ext.active)
            .unwrap_or(false)
    }

    /// List all installed extensions, ordered by name
    pub fn list_all(&self) -> Vec<(&str, &InstalledExtension)> {
        self.manifest
            .extensions
            .iter()
            .map(|(name, ext)| (name.as_str(), ext))
            .collect()
    }

    /// Record an installed extension (active)
    pub fn mark_installed(&mut self, name: &str, version: &str, source: &str) -> Result<()> {
        info!("Marking {} {} as installed", name, version);

        let extension = InstalledExtension {
            version: version.to_string(),
            installed_at: Utc::now(),
            source: source.to_string(),
            active: true,
        };

        self.manifest.extensions.insert(name.to_string(), extension);
        self.save()
    }

    /// Set the active flag of an extension
    ///
    /// Returns whether the flag changed. Setting the current value again is
    /// a no-op and does not touch the file.
    pub fn set_active(&mut self, name: &str, active: bool) -> Result<bool> {
        let ext = self
            .manifest
            .extensions
            .get_mut(name)
            .ok_or_else(|| anyhow!("Extension {} not found in manifest", name))?;

        if ext.active == active {
            debug!("{} already {}", name, if active { "active" } else { "inactive" });
            return Ok(false);
        }

        ext.active = active;
        self.save()?;
        Ok(true)
    }

    /// Remove an extension from the manifest
    pub fn remove(&mut self, name: &str) -> Result<()> {
        info!("Removing {} from manifest", name);
        self.manifest.extensions.remove(name);
        self.save()
    }
}
