//! Extension registry and compatibility matrix types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Compatibility matrix for platform ↔ extension versions
///
/// ```yaml
/// schema_version: "1.0"
/// versions:
///   "2.0.x":
///     compatible_extensions:
///       payments: "^3.0.0"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityMatrix {
    /// Schema version
    pub schema_version: String,

    /// Platform version compatibility, keyed by exact version or `MAJOR.MINOR.x`
    pub versions: HashMap<String, VersionCompat>,
}

impl CompatibilityMatrix {
    /// Find the entry for a target version
    ///
    /// Exact keys win over `MAJOR.MINOR.x` wildcard keys.
    pub fn entry_for(&self, target: &semver::Version) -> Option<&VersionCompat> {
        if let Some(entry) = self.versions.get(&target.to_string()) {
            return Some(entry);
        }

        self.versions.iter().find_map(|(pattern, entry)| {
            let prefix = pattern.strip_suffix(".x")?;
            let (major, minor) = prefix.split_once('.')?;
            let major: u64 = major.parse().ok()?;
            let minor: u64 = minor.parse().ok()?;

            (target.major == major && target.minor == minor).then_some(entry)
        })
    }
}

/// Platform version compatibility entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionCompat {
    /// Compatible extension version requirements
    #[serde(default)]
    pub compatible_extensions: BTreeMap<String, String>,

    /// Breaking changes in this version
    #[serde(default)]
    pub breaking_changes: Vec<String>,
}

/// Local installation manifest (~/.hoist/manifest.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallManifest {
    /// Schema version
    pub schema_version: String,

    /// Last update time
    pub last_updated: chrono::DateTime<chrono::Utc>,

    /// Installed extensions
    #[serde(default)]
    pub extensions: BTreeMap<String, InstalledExtension>,
}

impl Default for InstallManifest {
    fn default() -> Self {
        Self {
            schema_version: "1.0".to_string(),
            last_updated: chrono::Utc::now(),
            extensions: BTreeMap::new(),
        }
    }
}

/// Installed extension entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledExtension {
    /// Installed version
    pub version: String,

    /// Installation timestamp
    pub installed_at: chrono::DateTime<chrono::Utc>,

    /// Installation source
    pub source: String,

    /// Whether the extension is loaded by the runtime
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    const MATRIX_YAML: &str = r#"
schema_version: "1.0"
versions:
  "2.0.0":
    compatible_extensions:
      payments: "^3.0.0"
    breaking_changes:
      - "Checkout API removed"
  "2.0.x":
    compatible_extensions:
      payments: "^3.1.0"
  "2.1.x":
    compatible_extensions:
      search: ">=1.2.0"
"#;

    #[test]
    fn test_exact_entry_preferred() {
        let matrix: CompatibilityMatrix = serde_yaml_ng::from_str(MATRIX_YAML).unwrap();
        let entry = matrix.entry_for(&Version::new(2, 0, 0)).unwrap();
        assert_eq!(entry.compatible_extensions["payments"], "^3.0.0");
        assert_eq!(entry.breaking_changes.len(), 1);
    }

    #[test]
    fn test_wildcard_entry() {
        let matrix: CompatibilityMatrix = serde_yaml_ng::from_str(MATRIX_YAML).unwrap();
        let entry = matrix.entry_for(&Version::new(2, 0, 7)).unwrap();
        assert_eq!(entry.compatible_extensions["payments"], "^3.1.0");

        let entry = matrix.entry_for(&Version::new(2, 1, 3)).unwrap();
        assert!(entry.compatible_extensions.contains_key("search"));
    }

    #[test]
    fn test_no_entry() {
        let matrix: CompatibilityMatrix = serde_yaml_ng::from_str(MATRIX_YAML).unwrap();
        assert!(matrix.entry_for(&Version::new(3, 0, 0)).is_none());
    }

    #[test]
    fn test_installed_extension_defaults_active() {
        let yaml = r#"
version: "1.0.0"
installed_at: "2026-01-20T15:30:00Z"
source: "registry"
"#;
        let ext: InstalledExtension = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(ext.active);
    }
}
