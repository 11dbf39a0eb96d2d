//! Terminal output helpers
//!
//! Status lines go to stdout, warnings and failures to stderr, so that
//! `--json` output on stdout stays machine readable.

use std::time::Duration;

use console::{style, StyledObject};
use hoist_core::types::CompatibilityStatus;
use indicatif::{ProgressBar, ProgressStyle};

fn line(mark: StyledObject<&str>, msg: &str) -> String {
    format!("{} {}", mark.bold(), msg)
}

pub fn success(msg: &str) {
    println!("{}", line(style("✓").green(), msg));
}

pub fn info(msg: &str) {
    println!("{}", line(style("ℹ").blue(), msg));
}

pub fn warning(msg: &str) {
    eprintln!("{}", line(style("⚠").yellow(), msg));
}

pub fn error(msg: &str) {
    eprintln!("{}", line(style("✗").red(), msg));
}

/// Section title
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Indented `key: value` detail line
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Colored label for a compatibility status
pub fn compat_status(status: CompatibilityStatus) -> String {
    match status {
        CompatibilityStatus::Compatible => style("compatible").green(),
        CompatibilityStatus::Incompatible => style("incompatible").red(),
        CompatibilityStatus::Unknown => style("unknown").yellow(),
    }
    .to_string()
}

/// Spinner for a single network round trip
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Progress over the extensions selected for deactivation
pub fn batch_progress(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("[{bar:30.cyan/blue}] {pos}/{len} extensions {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.set_message("deactivated");
    pb
}
