//! Reactivate command

use anyhow::Result;
use camino::Utf8Path;
use dialoguer::Confirm;
use hoist_update::UpdateStateStore;

use crate::cli::ReactivateArgs;
use crate::context::AppContext;
use crate::output;

pub fn run(args: ReactivateArgs, config_dir: Option<&Utf8Path>) -> Result<()> {
    let ctx = AppContext::load(config_dir)?;
    let state = ctx.state_store()?;
    let recorded = state.deactivated_extensions();

    if recorded.is_empty() {
        output::info("No extensions were deactivated by an update preparation");
        return Ok(());
    }

    output::header("Extensions deactivated for the update");
    for name in &recorded {
        println!("  {}", name);
    }
    if let Some(previous) = state.previous_version() {
        output::kv("Prepared from version", &previous);
    }

    if !args.yes
        && !Confirm::new()
            .with_prompt(format!("Reactivate {} extension(s)?", recorded.len()))
            .default(true)
            .interact()?
    {
        output::info("Reactivation cancelled");
        return Ok(());
    }

    let reactivated = reactivate(&ctx, state)?;
    output::success(&format!("Reactivated {} extension(s)", reactivated.len()));
    Ok(())
}

fn reactivate(ctx: &AppContext, state: UpdateStateStore) -> Result<Vec<String>> {
    // Extensions removed since the preparation cannot be reactivated
    let manifest = ctx.manifest()?;
    let missing: Vec<String> = state
        .deactivated_extensions()
        .into_iter()
        .filter(|name| manifest.get(name).is_none())
        .collect();
    for name in &missing {
        output::warning(&format!("{} is no longer installed, skipping", name));
    }
    state.forget_deactivated(&missing)?;

    let controller = ctx.controller()?.with_state_store(state);
    let reactivated = controller.reactivate_extensions().inspect_err(|e| {
        output::error(&format!("Reactivation failed during {}: {}", e.phase(), e));
    })?;
    Ok(reactivated)
}
