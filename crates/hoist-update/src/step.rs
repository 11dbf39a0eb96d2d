//! Resumable batched deactivation
//!
//! One call deactivates at most `batch_size` extensions starting at `offset`
//! in the filtered, identifier-sorted selection. The selection ignores the
//! active flag, so `total` stays the same for every call of a sequence and
//! already inactive extensions are skipped without error.

use hoist_core::types::{DeactivationFilter, ExtensionRecord, StepOutcome, UpdateInfo};
use hoist_extensions::ExtensionLifecycle;
use tracing::{debug, error, info, warn};

use crate::compatibility::CompatibilityEvaluator;
use crate::error::{Result, UpdateError};
use crate::state::UpdateStateStore;

/// Deactivates the extensions selected by a filter, one batch per call
pub struct DeactivateExtensionsStep<'a> {
    update: &'a UpdateInfo,
    filter: DeactivationFilter,
    evaluator: CompatibilityEvaluator,
    lifecycle: &'a dyn ExtensionLifecycle,
    state: Option<&'a UpdateStateStore>,
    batch_size: usize,
}

impl<'a> DeactivateExtensionsStep<'a> {
    pub fn new(
        update: &'a UpdateInfo,
        filter: DeactivationFilter,
        lifecycle: &'a dyn ExtensionLifecycle,
        batch_size: usize,
    ) -> Self {
        Self {
            update,
            filter,
            evaluator: CompatibilityEvaluator::new(),
            lifecycle,
            state: None,
            batch_size: batch_size.max(1),
        }
    }

    /// Record deactivated extensions in `state`
    pub fn with_state_store(mut self, state: &'a UpdateStateStore) -> Self {
        self.state = Some(state);
        self
    }

    /// Extensions the filter selects, sorted by identifier
    pub fn selection(&self) -> Result<Vec<ExtensionRecord>> {
        let installed = self
            .lifecycle
            .installed()
            .map_err(|source| UpdateError::Lifecycle { source })?;

        Ok(self
            .evaluator
            .evaluate(self.update, &installed)
            .into_iter()
            .filter(|record| self.filter.matches(record.compatibility_status))
            .collect())
    }

    /// Process one batch starting at `offset`
    pub fn run(&self, offset: usize) -> Result<StepOutcome> {
        let selection = self.selection()?;
        let total = selection.len();

        if offset >= total {
            if offset > total {
                warn!("Offset {} is past the end of {} extension(s)", offset, total);
            }
            return Ok(StepOutcome::after_batch(total, total));
        }

        let end = (offset + self.batch_size).min(total);
        debug!(
            "Deactivating extensions {}..{} of {} (filter: {})",
            offset, end, total, self.filter
        );

        let mut deactivated = Vec::new();
        let result = selection[offset..end].iter().try_for_each(|record| {
            let was_active = self.lifecycle.deactivate(&record.identifier).map_err(|source| {
                UpdateError::Deactivation {
                    extension: record.identifier.clone(),
                    source,
                }
            })?;

            if was_active {
                info!(
                    "Deactivated {} ({})",
                    record.identifier, record.compatibility_status
                );
                deactivated.push(record.identifier.clone());
            }
            Ok(())
        });

        // Whatever was deactivated before a failure must still be recorded
        let recorded = self.record(&deactivated);

        match (result, recorded) {
            (Err(e), Err(record_err)) => {
                error!("Failed to record deactivated extensions: {:#}", record_err);
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), Err(record_err)) => Err(UpdateError::state(record_err)),
            (Ok(()), Ok(())) => Ok(StepOutcome::after_batch(end, total)),
        }
    }

    fn record(&self, deactivated: &[String]) -> anyhow::Result<()> {
        match self.state {
            Some(state) => state.record_deactivated(deactivated),
            None => Ok(()),
        }
    }
}
