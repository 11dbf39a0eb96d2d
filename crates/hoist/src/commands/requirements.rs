//! Requirements command

use anyhow::{bail, Result};
use camino::Utf8Path;
use hoist_doctor::RequirementsReport;

use crate::cli::RequirementsArgs;
use crate::context::AppContext;

pub async fn run(args: RequirementsArgs, config_dir: Option<&Utf8Path>) -> Result<()> {
    let controller = AppContext::load(config_dir)?.controller()?;

    let report = RequirementsReport::new(controller.check_requirements().await);
    print!("{}", report.format(args.format.into()));

    let failed = report.failed().count();
    if failed > 0 {
        bail!("{} requirement(s) not met", failed);
    }

    Ok(())
}
