//! Update check command

use anyhow::Result;
use camino::Utf8Path;
use hoist_update::VERSION;

use crate::cli::CheckArgs;
use crate::context::AppContext;
use crate::output;

pub async fn run(args: CheckArgs, config_dir: Option<&Utf8Path>) -> Result<()> {
    let ctx = AppContext::load(config_dir)?;
    let controller = ctx.controller()?;

    if ctx.config.update.disable_update_check && !args.json {
        output::warning("Update checks are disabled (update.disable-update-check)");
    }

    let spinner = output::spinner("Checking for updates...");
    let update = controller.check_for_update().await;
    spinner.finish_and_clear();
    let update = update?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&update)?);
        return Ok(());
    }

    output::info(&format!("Current version: {}", VERSION));
    match update {
        Some(info) => {
            output::success(&format!("Update available: {}", info.version));
            if let Some(title) = &info.title {
                output::kv("Release", title);
            }
            if let Some(date) = &info.release_date {
                output::kv("Published", date.get(..10).unwrap_or(date));
            }
            if let Some(changelog) = &info.changelog {
                let preview: Vec<&str> = changelog.lines().take(10).collect();
                println!("\nChangelog:\n{}\n", preview.join("\n"));
            }
            output::info("Run 'hoist requirements' and 'hoist prepare' before updating");
        }
        None => output::success("Already on the latest version"),
    }

    Ok(())
}
