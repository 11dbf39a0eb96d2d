//! Assertion helpers for step outcomes and update errors

use hoist_core::types::StepOutcome;
use hoist_update::{UpdateError, UpdatePhase};

pub fn assert_in_progress(outcome: &StepOutcome, offset: usize, total: usize) {
    assert_eq!(
        *outcome,
        StepOutcome::InProgress { offset, total },
        "Expected InProgress {{ offset: {}, total: {} }}",
        offset,
        total
    );
}

pub fn assert_finished(outcome: &StepOutcome, total: usize) {
    assert_eq!(
        *outcome,
        StepOutcome::Finished {
            offset: total,
            total
        },
        "Expected Finished with total {}",
        total
    );
}

/// Assert a deactivation failure blocked by `extension`
pub fn assert_deactivation_error(err: &UpdateError, extension: &str) {
    assert!(
        matches!(err, UpdateError::Deactivation { .. }),
        "Expected deactivation error, got: {}",
        err
    );
    assert_eq!(err.phase(), UpdatePhase::Deactivation);
    assert_eq!(err.extension(), Some(extension));
}

/// Assert a veto in `phase` by `handler`
pub fn assert_aborted(err: &UpdateError, phase: UpdatePhase, handler: &str) {
    match err {
        UpdateError::Aborted {
            phase: actual_phase,
            handler: actual_handler,
            ..
        } => {
            assert_eq!(*actual_phase, phase);
            assert_eq!(actual_handler, handler);
        }
        other => panic!("Expected aborted error, got: {}", other),
    }
}
