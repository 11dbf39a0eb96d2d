//! Update preparation controller
//!
//! Ties the release oracle, requirement checks, compatibility evaluation and
//! the batched deactivation step into the sequence a polling client drives:
//!
//! 1. `run_deactivation_batch(0, filter)` fires the pre-prepare event
//! 2. every call deactivates one batch and returns the next offset
//! 3. the call that finishes reloads the runtime without extensions and
//!    fires the post-prepare event on the reloaded handlers

use std::sync::{Arc, RwLock};

use hoist_core::types::{
    DeactivationFilter, ExtensionRecord, RequirementCheckResult, StepOutcome, UpdateConfig,
    UpdateInfo,
};
use hoist_doctor::RequirementsChecker;
use hoist_extensions::ExtensionLifecycle;
use semver::Version;
use tracing::{debug, info, warn};

use crate::compatibility::CompatibilityEvaluator;
use crate::error::{Result, UpdateError};
use crate::events::{PhaseEvent, PhaseEventBus};
use crate::releases::VersionOracle;
use crate::runtime::{RuntimeHandle, RuntimeReloader, StaticRuntimeReloader};
use crate::state::UpdateStateStore;
use crate::step::DeactivateExtensionsStep;

/// Controller behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Extensions deactivated per call
    pub batch_size: usize,

    /// Report no update without contacting the oracle
    pub disable_update_check: bool,

    /// Reject non-zero offsets without a started sequence
    pub require_sequence_start: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&UpdateConfig::default())
    }
}

impl From<&UpdateConfig> for ControllerSettings {
    fn from(config: &UpdateConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            disable_update_check: config.disable_update_check,
            require_sequence_start: config.require_sequence_start,
        }
    }
}

/// Drives update preparation
pub struct UpdateController {
    current_version: Version,
    oracle: Arc<dyn VersionOracle>,
    lifecycle: Arc<dyn ExtensionLifecycle>,
    requirements: RequirementsChecker,
    evaluator: CompatibilityEvaluator,
    reloader: Arc<dyn RuntimeReloader>,
    runtime: RwLock<RuntimeHandle>,
    state: UpdateStateStore,
    settings: ControllerSettings,
}

impl UpdateController {
    pub fn new(
        current_version: Version,
        oracle: Arc<dyn VersionOracle>,
        lifecycle: Arc<dyn ExtensionLifecycle>,
        runtime: RuntimeHandle,
    ) -> Self {
        Self {
            current_version,
            oracle,
            lifecycle,
            requirements: RequirementsChecker::new(),
            evaluator: CompatibilityEvaluator::new(),
            reloader: Arc::new(StaticRuntimeReloader),
            runtime: RwLock::new(runtime),
            state: UpdateStateStore::in_memory(),
            settings: ControllerSettings::default(),
        }
    }

    pub fn with_requirements(mut self, requirements: RequirementsChecker) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_reloader(mut self, reloader: Arc<dyn RuntimeReloader>) -> Self {
        self.reloader = reloader;
        self
    }

    pub fn with_state_store(mut self, state: UpdateStateStore) -> Self {
        self.state = state;
        self
    }

    pub fn with_settings(mut self, settings: ControllerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn current_version(&self) -> &Version {
        &self.current_version
    }

    pub fn settings(&self) -> ControllerSettings {
        self.settings
    }

    pub fn state(&self) -> &UpdateStateStore {
        &self.state
    }

    /// Snapshot of the live runtime
    pub fn runtime(&self) -> RuntimeHandle {
        self.runtime
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn events(&self) -> PhaseEventBus {
        self.runtime().events().clone()
    }

    /// Newer release, or `None` when up to date or checks are disabled
    pub async fn check_for_update(&self) -> Result<Option<UpdateInfo>> {
        if self.settings.disable_update_check {
            debug!("Update check disabled");
            return Ok(None);
        }

        let info = self.oracle.check_for_updates().await?;
        let target = parse_version(&info.version)?;

        if self.current_version >= target {
            debug!(
                "Current version {} is not older than {}",
                self.current_version, target
            );
            return Ok(None);
        }

        Ok(Some(info))
    }

    /// Run every environment requirement check
    pub async fn check_requirements(&self) -> Vec<RequirementCheckResult> {
        self.requirements.run_checks().await
    }

    /// Classify installed extensions against the latest release
    pub async fn evaluate_compatibility(&self) -> Result<Vec<ExtensionRecord>> {
        let update = self.oracle.check_for_updates().await?;
        let installed = self
            .lifecycle
            .installed()
            .map_err(|source| UpdateError::Lifecycle { source })?;

        Ok(self.evaluator.evaluate(&update, &installed))
    }

    /// Deactivate one batch of extensions
    ///
    /// Offset 0 starts a sequence and fires the pre-prepare event; a veto
    /// aborts before any extension is touched. The call that returns
    /// [`StepOutcome::Finished`] reloads the runtime and fires the
    /// post-prepare event exactly once.
    pub async fn run_deactivation_batch(
        &self,
        offset: usize,
        filter: Option<DeactivationFilter>,
    ) -> Result<StepOutcome> {
        let filter = filter.unwrap_or_default();
        let update = self.oracle.check_for_updates().await?;
        let current = self.current_version.to_string();
        let target = update.version.clone();

        if offset == 0 {
            self.events()
                .dispatch(&PhaseEvent::pre_prepare(&current, &target))?;
            self.state
                .begin_sequence(&current, &target, filter)
                .map_err(UpdateError::state)?;
            info!(
                "Started update preparation {} -> {} (filter: {})",
                current, target, filter
            );
        } else if self.settings.require_sequence_start {
            self.verify_sequence(offset, &target, filter)?;
        }

        let outcome = DeactivateExtensionsStep::new(
            &update,
            filter,
            self.lifecycle.as_ref(),
            self.settings.batch_size,
        )
        .with_state_store(&self.state)
        .run(offset)?;

        debug!("Batch at offset {} -> {:?}", offset, outcome);

        if outcome.is_finished() {
            let reloaded = self.reload_runtime()?;
            reloaded
                .events()
                .dispatch(&PhaseEvent::post_prepare(&current, &target))?;
            self.state.clear_sequence().map_err(UpdateError::state)?;
            info!(
                "Update preparation finished: {} extension(s) processed",
                outcome.total()
            );
        }

        Ok(outcome)
    }

    /// Reactivate every extension the update deactivated
    ///
    /// Returns the extensions that were switched back on. Stops at the first
    /// failure; extensions handled before it are no longer recorded.
    pub fn reactivate_extensions(&self) -> Result<Vec<String>> {
        let recorded = self.state.deactivated_extensions();
        let mut handled = Vec::new();
        let mut reactivated = Vec::new();

        let result = recorded.iter().try_for_each(|name| {
            let was_inactive =
                self.lifecycle
                    .activate(name)
                    .map_err(|source| UpdateError::Reactivation {
                        extension: name.clone(),
                        source,
                    })?;
            if was_inactive {
                info!("Reactivated {}", name);
                reactivated.push(name.clone());
            }
            handled.push(name.clone());
            Ok(())
        });

        self.state
            .forget_deactivated(&handled)
            .map_err(UpdateError::state)?;
        result.map(|()| reactivated)
    }

    fn verify_sequence(
        &self,
        offset: usize,
        target: &str,
        filter: DeactivationFilter,
    ) -> Result<()> {
        match self.state.sequence() {
            Some(marker) if marker.target_version == target => {
                if marker.filter != filter {
                    return Err(UpdateError::FilterMismatch {
                        expected: marker.filter,
                        actual: filter,
                    });
                }
                Ok(())
            }
            marker => {
                if let Some(marker) = marker {
                    warn!(
                        "Sequence was started for {}, release is now {}",
                        marker.target_version, target
                    );
                }
                Err(UpdateError::SequenceNotStarted {
                    offset,
                    target_version: target.to_string(),
                })
            }
        }
    }

    fn reload_runtime(&self) -> Result<RuntimeHandle> {
        let mut runtime = self
            .runtime
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let reloaded = self
            .reloader
            .reload_without_extensions(&runtime)
            .map_err(|source| UpdateError::Reload { source })?;

        *runtime = reloaded.clone();
        Ok(reloaded)
    }
}

fn parse_version(version: &str) -> Result<Version> {
    Version::parse(version.trim_start_matches('v'))
        .map_err(|_| UpdateError::invalid_version(version))
}
