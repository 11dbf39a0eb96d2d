//! Requirement report formatting
//!
//! Provides formatting for requirement results in multiple output formats:
//! human-readable, JSON, and YAML.

use hoist_core::types::RequirementCheckResult;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

/// Output format for requirement results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable colored output
    #[default]
    Human,
    /// JSON format for machine consumption
    Json,
    /// YAML format for machine consumption
    Yaml,
}

/// Collected requirement results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementsReport {
    pub results: Vec<RequirementCheckResult>,
}

impl RequirementsReport {
    pub fn new(results: Vec<RequirementCheckResult>) -> Self {
        Self { results }
    }

    /// Whether every check passed
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Failing checks
    pub fn failed(&self) -> impl Iterator<Item = &RequirementCheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Format the report
    pub fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.format_human(),
            // Serializing plain strings and bools cannot fail
            OutputFormat::Json => {
                serde_json::to_string_pretty(&self.results).unwrap_or_default()
            }
            OutputFormat::Yaml => serde_yaml_ng::to_string(&self.results).unwrap_or_default(),
        }
    }

    fn format_human(&self) -> String {
        let mut output = format!("{}\n", "Update requirements".bold());

        for result in &self.results {
            let marker = if result.passed {
                "✓".green().to_string()
            } else {
                "✗".red().to_string()
            };
            output.push_str(&format!("  {} {}", marker, result.name));
            if !result.details.is_empty() {
                output.push_str(&format!(" - {}", result.details.dimmed()));
            }
            output.push('\n');
        }

        let failed = self.failed().count();
        if failed == 0 {
            output.push_str(&format!("\n{}\n", "All requirements met".green()));
        } else {
            output.push_str(&format!(
                "\n{}\n",
                format!("{} requirement(s) not met", failed).red()
            ));
        }

        output
    }
}
