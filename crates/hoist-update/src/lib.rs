//! Update preparation for hoist
//!
//! This crate prepares an installation for a platform update:
//! - Release discovery through a [`VersionOracle`]
//! - Extension compatibility evaluation against the target release
//! - Resumable, batched deactivation of extensions
//! - Pre- and post-prepare phase events with veto support
//! - Runtime reload without extensions once deactivation finishes
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hoist_core::types::{DeactivationFilter, UpdateInfo};
//! use hoist_extensions::{ManifestLifecycle, ManifestManager};
//! use hoist_update::{RuntimeHandle, StaticVersionOracle, UpdateController};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let lifecycle = ManifestLifecycle::new(ManifestManager::new("manifest.yaml".into())?);
//! let oracle = StaticVersionOracle::new(UpdateInfo::new("2.0.0"));
//! let controller = UpdateController::new(
//!     semver::Version::new(1, 4, 0),
//!     Arc::new(oracle),
//!     Arc::new(lifecycle),
//!     RuntimeHandle::default(),
//! );
//!
//! let mut offset = 0;
//! loop {
//!     let outcome = controller
//!         .run_deactivation_batch(offset, Some(DeactivationFilter::NotCompatible))
//!         .await?;
//!     if outcome.is_finished() {
//!         break;
//!     }
//!     offset = outcome.offset();
//! }
//! # Ok(())
//! # }
//! ```

pub mod compatibility;
pub mod controller;
pub mod error;
pub mod events;
pub mod releases;
pub mod runtime;
pub mod state;
pub mod step;

pub use compatibility::CompatibilityEvaluator;
pub use controller::{ControllerSettings, UpdateController};
pub use error::{Result, UpdateError, UpdatePhase};
pub use events::{
    FnHandler, HandlerDecision, HandlerOrigin, PhaseEvent, PhaseEventBus, PhaseHandler,
    TracingHandler,
};
pub use releases::{Release, ReleaseManager, StaticVersionOracle, VersionOracle};
pub use runtime::{RuntimeHandle, RuntimeReloader, StaticRuntimeReloader};
pub use state::{SequenceMarker, UpdateState, UpdateStateStore};
pub use step::DeactivateExtensionsStep;

/// Current hoist version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
