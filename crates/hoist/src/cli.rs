//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use hoist_core::types::DeactivationFilter;
use hoist_doctor::OutputFormat;

/// Hoist - staged, resumable update preparation
#[derive(Parser, Debug)]
#[command(name = "hoist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration directory (default: ~/.hoist)
    #[arg(long, global = true, env = "HOIST_CONFIG_DIR")]
    pub config_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Check whether a newer release is available
    Check(CheckArgs),

    /// Check environment requirements for the update
    Requirements(RequirementsArgs),

    /// Show installed extension compatibility with the latest release
    Compat(CompatArgs),

    /// Deactivate extensions ahead of the update
    Prepare(PrepareArgs),

    /// Reactivate extensions deactivated by a previous preparation
    Reactivate(ReactivateArgs),

    /// Installed extension management
    #[command(subcommand)]
    Extension(ExtensionCommands),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RequirementsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

#[derive(Args, Debug)]
pub struct CompatArgs {
    /// Mark extensions this filter would deactivate
    #[arg(short, long)]
    pub filter: Option<DeactivationFilter>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Offset returned by the previous call
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Which extensions to deactivate: notCompatible, unknown or all
    #[arg(short, long)]
    pub filter: Option<DeactivationFilter>,

    /// Process a single batch and print the step response
    #[arg(long)]
    pub once: bool,

    /// Output the step response as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the configured batch size for this run
    ///
    /// Not available with --once, where every polled call must use the
    /// same configured batch size.
    #[arg(
        long,
        conflicts_with = "once",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub batch_size: Option<u64>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ReactivateArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// Extension commands
#[derive(Subcommand, Debug)]
pub enum ExtensionCommands {
    /// List installed extensions
    List(ExtensionListArgs),

    /// Record an installed extension
    Add(ExtensionAddArgs),

    /// Remove an extension from the manifest
    Remove(ExtensionNameArgs),

    /// Activate an extension
    Enable(ExtensionNameArgs),

    /// Deactivate an extension
    Disable(ExtensionNameArgs),
}

#[derive(Args, Debug)]
pub struct ExtensionListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExtensionAddArgs {
    /// Extension name
    pub name: String,

    /// Installed version
    #[arg(id = "extension_version", value_name = "VERSION")]
    pub version: String,

    /// Where the extension came from
    #[arg(long, default_value = "local")]
    pub source: String,
}

#[derive(Args, Debug)]
pub struct ExtensionNameArgs {
    /// Extension name
    pub name: String,
}

/// Report format argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Human,
    Json,
    Yaml,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Human => OutputFormat::Human,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_prepare_args() {
        let cli = Cli::parse_from([
            "hoist", "prepare", "--offset", "50", "--filter", "unknown", "--once", "--json",
        ]);
        match cli.command {
            Commands::Prepare(args) => {
                assert_eq!(args.offset, 50);
                assert_eq!(args.filter, Some(DeactivationFilter::Unknown));
                assert!(args.once);
                assert!(args.json);
                assert!(args.batch_size.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_prepare_rejects_zero_batch_size() {
        assert!(Cli::try_parse_from(["hoist", "prepare", "--batch-size", "0"]).is_err());
    }

    #[test]
    fn test_batch_size_override_only_when_looping() {
        assert!(Cli::try_parse_from(["hoist", "prepare", "--once", "--batch-size", "5"]).is_err());

        let cli = Cli::parse_from(["hoist", "prepare", "--batch-size", "5"]);
        match cli.command {
            Commands::Prepare(args) => assert_eq!(args.batch_size, Some(5)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_filter_rejected() {
        assert!(Cli::try_parse_from(["hoist", "prepare", "--filter", "broken"]).is_err());
    }
}
