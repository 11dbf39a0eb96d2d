//! Version command

use anyhow::Result;
use serde::Serialize;

use crate::cli::VersionArgs;

/// Build information baked in by the build script
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
    pub target: Option<&'static str>,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: hoist_update::VERSION,
            commit: option_env!("GIT_SHA"),
            build_date: option_env!("BUILD_DATE"),
            target: option_env!("TARGET"),
        }
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hoist {}", self.version)?;

        let build: Vec<&str> = [self.commit, self.build_date].into_iter().flatten().collect();
        if !build.is_empty() {
            write!(f, " ({})", build.join(", "))?;
        }
        if let Some(target) = self.target {
            write!(f, " {}", target)?;
        }
        Ok(())
    }
}

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info);
    }

    Ok(())
}
