//! Prepare command
//!
//! Drives the deactivation sequence. With `--once` a single batch runs and
//! the step response is printed so an external client can poll with the
//! returned offset; otherwise the command loops until the sequence finishes.

use anyhow::{bail, Result};
use camino::Utf8Path;
use dialoguer::Confirm;
use hoist_core::types::{DeactivationFilter, StepOutcome, StepResponse};
use hoist_update::{UpdateController, UpdateError};
use indicatif::ProgressBar;

use crate::cli::PrepareArgs;
use crate::context::AppContext;
use crate::output;

pub async fn run(args: PrepareArgs, config_dir: Option<&Utf8Path>) -> Result<()> {
    let mut ctx = AppContext::load(config_dir)?;
    if let Some(batch_size) = args.batch_size {
        ctx.config.update.batch_size = usize::try_from(batch_size)?;
    }
    let controller = ctx.controller()?;
    let filter = args.filter.unwrap_or_default();

    if args.once {
        let outcome = controller
            .run_deactivation_batch(args.offset, Some(filter))
            .await
            .inspect_err(|e| report_failure(e, args.offset))?;
        return print_outcome(outcome, args.json);
    }

    if args.offset == 0 && !args.yes && !args.json && !confirm(&controller, filter).await? {
        output::info("Preparation cancelled");
        return Ok(());
    }

    let outcome = drive(&controller, args.offset, filter, !args.json).await?;
    print_outcome(outcome, args.json)?;

    if !args.json {
        let deactivated = controller.state().deactivated_extensions();
        if !deactivated.is_empty() {
            output::info(&format!(
                "{} extension(s) deactivated for the update; run 'hoist reactivate' afterwards",
                deactivated.len()
            ));
        }
    }

    Ok(())
}

async fn confirm(controller: &UpdateController, filter: DeactivationFilter) -> Result<bool> {
    let Some(update) = controller.check_for_update().await? else {
        output::warning("No newer release available");
        return Ok(Confirm::new()
            .with_prompt("Deactivate extensions anyway?")
            .default(false)
            .interact()?);
    };

    let selected = controller
        .evaluate_compatibility()
        .await?
        .into_iter()
        .filter(|r| filter.matches(r.compatibility_status))
        .count();

    output::info(&format!(
        "Preparing update {} -> {}: {} extension(s) match filter {}",
        controller.current_version(),
        update.version,
        selected,
        filter
    ));

    Ok(Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?)
}

async fn drive(
    controller: &UpdateController,
    start: usize,
    filter: DeactivationFilter,
    show_progress: bool,
) -> Result<StepOutcome> {
    let mut offset = start;
    let mut progress: Option<ProgressBar> = None;

    loop {
        let outcome = match controller.run_deactivation_batch(offset, Some(filter)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if let Some(pb) = &progress {
                    pb.abandon();
                }
                report_failure(&e, offset);
                return Err(e.into());
            }
        };

        if show_progress {
            let pb = progress.get_or_insert_with(|| output::batch_progress(outcome.total()));
            pb.set_position(outcome.offset() as u64);
        }

        if outcome.is_finished() {
            if let Some(pb) = &progress {
                pb.finish_and_clear();
            }
            return Ok(outcome);
        }

        if outcome.offset() <= offset {
            bail!("Deactivation made no progress at offset {}", offset);
        }
        offset = outcome.offset();
    }
}

fn print_outcome(outcome: StepOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&StepResponse::from(outcome))?);
        return Ok(());
    }

    match outcome {
        StepOutcome::InProgress { offset, total } => {
            output::info(&format!("Processed {}/{} extension(s)", offset, total));
            output::kv("Next", &format!("hoist prepare --once --offset {}", offset));
        }
        StepOutcome::Finished { total, .. } => {
            output::success(&format!(
                "Preparation finished: {} extension(s) processed, runtime reloaded without extensions",
                total
            ));
        }
    }

    Ok(())
}

fn report_failure(err: &UpdateError, offset: usize) {
    output::error(&format!("Preparation failed during {}: {}", err.phase(), err));

    match err {
        UpdateError::Deactivation { .. } => output::info(&format!(
            "Already deactivated extensions stay inactive; retry with --offset {}",
            offset
        )),
        UpdateError::Reload { .. } => output::warning(
            "Extensions were deactivated but the runtime could not be reloaded; do not continue the update",
        ),
        UpdateError::SequenceNotStarted { .. } | UpdateError::FilterMismatch { .. } => {
            output::info("Restart the preparation with --offset 0")
        }
        _ if err.is_retryable() => output::info("The call can be retried"),
        _ => {}
    }
}
