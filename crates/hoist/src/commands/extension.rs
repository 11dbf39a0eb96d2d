//! Extension manifest commands

use anyhow::Result;
use camino::Utf8Path;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::{ExtensionAddArgs, ExtensionCommands, ExtensionListArgs, ExtensionNameArgs};
use crate::context::AppContext;
use crate::output;

pub fn run(cmd: ExtensionCommands, config_dir: Option<&Utf8Path>) -> Result<()> {
    let ctx = AppContext::load(config_dir)?;

    match cmd {
        ExtensionCommands::List(args) => list(&ctx, args),
        ExtensionCommands::Add(args) => add(&ctx, args),
        ExtensionCommands::Remove(args) => remove(&ctx, args),
        ExtensionCommands::Enable(args) => set_active(&ctx, args, true),
        ExtensionCommands::Disable(args) => set_active(&ctx, args, false),
    }
}

#[derive(Tabled, Serialize)]
struct ExtensionRow {
    name: String,
    version: String,
    active: bool,
    source: String,
    #[tabled(rename = "installed at")]
    installed_at: String,
}

fn list(ctx: &AppContext, args: ExtensionListArgs) -> Result<()> {
    let manifest = ctx.manifest()?;
    let rows: Vec<ExtensionRow> = manifest
        .list_all()
        .into_iter()
        .map(|(name, ext)| ExtensionRow {
            name: name.to_string(),
            version: ext.version.clone(),
            active: ext.active,
            source: ext.source.clone(),
            installed_at: ext.installed_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        output::info(&format!("No extensions recorded in {}", manifest.path()));
        return Ok(());
    }

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
    Ok(())
}

fn add(ctx: &AppContext, args: ExtensionAddArgs) -> Result<()> {
    if semver::Version::parse(&args.version).is_err() {
        output::warning(&format!(
            "{} is not a semantic version; compatibility checks will treat it as 0.0.0",
            args.version
        ));
    }

    let mut manifest = ctx.manifest()?;
    manifest.mark_installed(&args.name, &args.version, &args.source)?;
    output::success(&format!("Recorded {} {}", args.name, args.version));
    Ok(())
}

fn remove(ctx: &AppContext, args: ExtensionNameArgs) -> Result<()> {
    let mut manifest = ctx.manifest()?;
    if manifest.get(&args.name).is_none() {
        output::warning(&format!("{} is not installed", args.name));
        return Ok(());
    }

    manifest.remove(&args.name)?;
    output::success(&format!("Removed {}", args.name));
    Ok(())
}

fn set_active(ctx: &AppContext, args: ExtensionNameArgs, active: bool) -> Result<()> {
    let mut manifest = ctx.manifest()?;
    let changed = manifest.set_active(&args.name, active)?;
    let state = if active { "active" } else { "inactive" };

    if changed {
        output::success(&format!("{} is now {}", args.name, state));
    } else {
        output::info(&format!("{} is already {}", args.name, state));
    }
    Ok(())
}
