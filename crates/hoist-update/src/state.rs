//! Persistent update state
//!
//! Tracks what an update preparation changed so it can be continued or
//! undone from another process: the version being left, the extensions the
//! update deactivated, and the marker of the sequence in progress.
//!
//! ```yaml
//! previous_version: "6.4.0"
//! deactivated_extensions:
//!   - seo-tools
//! sequence:
//!   target_version: "6.5.0"
//!   filter: notCompatible
//!   started_at: "2026-10-16T08:00:00Z"
//! ```

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use hoist_core::types::DeactivationFilter;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A deactivation sequence in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceMarker {
    pub target_version: String,
    pub filter: DeactivationFilter,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,

    #[serde(default)]
    pub deactivated_extensions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<SequenceMarker>,
}

/// Update state, optionally backed by a YAML file
pub struct UpdateStateStore {
    path: Option<Utf8PathBuf>,
    state: Mutex<UpdateState>,
}

impl UpdateStateStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<Utf8PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read update state from {}", path))?;
            serde_yaml_ng::from_str(&content)
                .with_context(|| format!("Failed to parse update state at {}", path))?
        } else {
            UpdateState::default()
        };

        Ok(Self {
            path: Some(path),
            state: Mutex::new(state),
        })
    }

    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(UpdateState::default()),
        }
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    pub fn snapshot(&self) -> UpdateState {
        self.lock().clone()
    }

    pub fn previous_version(&self) -> Option<String> {
        self.lock().previous_version.clone()
    }

    pub fn deactivated_extensions(&self) -> Vec<String> {
        self.lock().deactivated_extensions.clone()
    }

    pub fn sequence(&self) -> Option<SequenceMarker> {
        self.lock().sequence.clone()
    }

    /// Start a sequence towards `target_version`
    pub fn begin_sequence(
        &self,
        previous_version: &str,
        target_version: &str,
        filter: DeactivationFilter,
    ) -> Result<()> {
        self.update(|state| {
            state.previous_version = Some(previous_version.to_string());
            state.sequence = Some(SequenceMarker {
                target_version: target_version.to_string(),
                filter,
                started_at: Utc::now(),
            });
        })
    }

    pub fn clear_sequence(&self) -> Result<()> {
        self.update(|state| state.sequence = None)
    }

    /// Remember extensions deactivated by the update
    pub fn record_deactivated(&self, extensions: &[String]) -> Result<()> {
        if extensions.is_empty() {
            return Ok(());
        }

        self.update(|state| {
            for name in extensions {
                if !state.deactivated_extensions.contains(name) {
                    state.deactivated_extensions.push(name.clone());
                }
            }
        })
    }

    /// Forget the given extensions after they were reactivated
    pub fn forget_deactivated(&self, extensions: &[String]) -> Result<()> {
        self.update(|state| {
            state
                .deactivated_extensions
                .retain(|name| !extensions.contains(name))
        })
    }

    /// Apply `f` and persist; memory only changes once the write succeeded
    fn update(&self, f: impl FnOnce(&mut UpdateState)) -> Result<()> {
        let mut state = self.lock();
        let mut next = state.clone();
        f(&mut next);
        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    fn persist(&self, state: &UpdateState) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent))?;
        }

        let content = serde_yaml_ng::to_string(state)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write update state to {}", path))?;
        debug!("Update state saved to {}", path);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, UpdateState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for UpdateStateStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
