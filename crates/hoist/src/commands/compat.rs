//! Compatibility command

use anyhow::Result;
use camino::Utf8Path;
use hoist_core::types::ExtensionRecord;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::CompatArgs;
use crate::context::AppContext;
use crate::output;

#[derive(Tabled)]
struct CompatRow {
    #[tabled(rename = "extension")]
    identifier: String,
    #[tabled(rename = "installed")]
    installed_version: String,
    active: String,
    status: String,
    #[tabled(rename = "deactivate")]
    selected: String,
}

pub async fn run(args: CompatArgs, config_dir: Option<&Utf8Path>) -> Result<()> {
    let controller = AppContext::load(config_dir)?.controller()?;

    let spinner = output::spinner("Evaluating extension compatibility...");
    let records = controller.evaluate_compatibility().await;
    spinner.finish_and_clear();
    let records = records?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        output::info("No extensions installed");
        return Ok(());
    }

    let filter = args.filter.unwrap_or_default();
    output::header(&format!("Extension compatibility (filter: {})", filter));

    let rows: Vec<CompatRow> = records
        .iter()
        .map(|r| row(r, filter.matches(r.compatibility_status)))
        .collect();
    let selected = rows.iter().filter(|r| r.selected == "yes").count();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);

    if selected > 0 {
        output::warning(&format!(
            "{} extension(s) will be deactivated by 'hoist prepare --filter {}'",
            selected, filter
        ));
    } else {
        output::success("No extension needs to be deactivated");
    }

    Ok(())
}

fn row(record: &ExtensionRecord, selected: bool) -> CompatRow {
    CompatRow {
        identifier: record.identifier.clone(),
        installed_version: record.installed_version.clone(),
        active: if record.currently_active { "yes" } else { "no" }.to_string(),
        status: output::compat_status(record.compatibility_status),
        selected: if selected { "yes" } else { "-" }.to_string(),
    }
}
