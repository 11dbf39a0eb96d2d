//! Error types for hoist-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and data model errors
#[derive(Error, Debug)]
pub enum Error {
    /// A built-in defaults file is missing from the binary
    #[error("Built-in configuration missing: {name}")]
    EmbeddedConfigMissing { name: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown deactivation filter: {filter}. Valid filters: notCompatible, unknown, all")]
    InvalidFilter { filter: String },
}

impl Error {
    pub fn embedded_config_missing(name: impl Into<String>) -> Self {
        Self::EmbeddedConfigMissing { name: name.into() }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn invalid_filter(filter: impl Into<String>) -> Self {
        Self::InvalidFilter {
            filter: filter.into(),
        }
    }
}
