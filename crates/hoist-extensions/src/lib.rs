//! Extension management for hoist
//!
//! This crate handles:
//! - The local extension manifest (installed versions, active flags)
//! - Activating and deactivating extensions through [`ExtensionLifecycle`]

pub mod lifecycle;
pub mod manifest;

pub use lifecycle::{ExtensionLifecycle, ExtensionSummary, ManifestLifecycle};
pub use manifest::ManifestManager;
