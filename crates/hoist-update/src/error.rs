//! Update workflow errors

use hoist_core::types::DeactivationFilter;
use std::fmt;
use thiserror::Error;

/// Result type alias for update operations
pub type Result<T> = std::result::Result<T, UpdateError>;

/// Phase of the update workflow an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    VersionCheck,
    Compatibility,
    PrePrepare,
    Deactivation,
    Reload,
    PostPrepare,
    Reactivation,
    State,
    Configuration,
}

impl fmt::Display for UpdatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VersionCheck => "version-check",
            Self::Compatibility => "compatibility",
            Self::PrePrepare => "pre-prepare",
            Self::Deactivation => "deactivation",
            Self::Reload => "reload",
            Self::PostPrepare => "post-prepare",
            Self::Reactivation => "reactivation",
            Self::State => "state",
            Self::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

/// Errors raised while preparing an update
#[derive(Error, Debug)]
pub enum UpdateError {
    /// The release source could not be reached or answered unexpectedly
    #[error("Update check failed: {message}")]
    Transport { message: String },

    /// A phase handler vetoed the update
    #[error("Update aborted by {handler}: {reason}")]
    Aborted {
        phase: UpdatePhase,
        handler: String,
        reason: String,
    },

    /// A phase handler failed unexpectedly
    #[error("Handler {handler} failed during {phase}")]
    HandlerFailed {
        phase: UpdatePhase,
        handler: String,
        #[source]
        source: anyhow::Error,
    },

    /// An extension could not be deactivated; the offset was not advanced
    #[error("Failed to deactivate extension {extension}")]
    Deactivation {
        extension: String,
        #[source]
        source: anyhow::Error,
    },

    /// An extension recorded by the update could not be reactivated
    #[error("Failed to reactivate extension {extension}")]
    Reactivation {
        extension: String,
        #[source]
        source: anyhow::Error,
    },

    /// The runtime could not be rebuilt without extensions
    ///
    /// Deactivations already performed stay in effect.
    #[error("Failed to reload runtime without extensions")]
    Reload {
        #[source]
        source: anyhow::Error,
    },

    /// The installed extension set could not be read
    #[error("Failed to read installed extensions")]
    Lifecycle {
        #[source]
        source: anyhow::Error,
    },

    /// A batch at a non-zero offset arrived without a started sequence
    #[error("No update sequence started for {target_version}; restart at offset 0 (got offset {offset})")]
    SequenceNotStarted {
        offset: usize,
        target_version: String,
    },

    /// The filter changed in the middle of a sequence
    #[error("Deactivation filter changed mid-sequence: started with {expected}, got {actual}")]
    FilterMismatch {
        expected: DeactivationFilter,
        actual: DeactivationFilter,
    },

    /// A version string could not be parsed
    #[error("Invalid version: {version}")]
    InvalidVersion { version: String },

    /// Update state could not be read or written
    #[error("Failed to persist update state")]
    State {
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] hoist_core::Error),
}

impl UpdateError {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Create a state error
    pub fn state(source: impl Into<anyhow::Error>) -> Self {
        Self::State {
            source: source.into(),
        }
    }

    /// The workflow phase that failed
    pub fn phase(&self) -> UpdatePhase {
        match self {
            Self::Transport { .. } | Self::InvalidVersion { .. } => UpdatePhase::VersionCheck,
            Self::Aborted { phase, .. } | Self::HandlerFailed { phase, .. } => *phase,
            Self::Deactivation { .. } => UpdatePhase::Deactivation,
            Self::Reactivation { .. } => UpdatePhase::Reactivation,
            Self::Reload { .. } => UpdatePhase::Reload,
            Self::Lifecycle { .. } => UpdatePhase::Compatibility,
            Self::SequenceNotStarted { .. } | Self::FilterMismatch { .. } | Self::State { .. } => {
                UpdatePhase::State
            }
            Self::Config(_) => UpdatePhase::Configuration,
        }
    }

    /// Extension that blocked progress, if any
    pub fn extension(&self) -> Option<&str> {
        match self {
            Self::Deactivation { extension, .. } | Self::Reactivation { extension, .. } => {
                Some(extension)
            }
            _ => None,
        }
    }

    /// Whether retrying the same call can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Deactivation { .. } | Self::State { .. }
        )
    }
}
