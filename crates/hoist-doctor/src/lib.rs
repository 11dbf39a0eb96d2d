//! hoist Doctor - update requirement checks
//!
//! Runs independent environment checks before an update is prepared and
//! reports a pass/fail result per check.
//!
//! # Features
//!
//! - **Writable paths**: every configured directory must accept new files
//! - **License**: the installation license must be present and unexpired
//! - **Concurrent checking**: checks run in parallel, each bounded by a timeout
//! - **Multi-Format Output**: Human-readable, JSON, and YAML output formats
//!
//! # Example
//!
//! ```rust,no_run
//! use hoist_core::types::RequirementsConfig;
//! use hoist_doctor::{OutputFormat, RequirementsChecker, RequirementsReport};
//!
//! #[tokio::main]
//! async fn main() {
//!     let checker = RequirementsChecker::from_config(&RequirementsConfig::default());
//!     let report = RequirementsReport::new(checker.run_checks().await);
//!
//!     println!("{}", report.format(OutputFormat::Human));
//! }
//! ```

mod check;
mod license;
mod reporter;
mod writable;

pub use check::{RequirementCheck, RequirementsChecker};
pub use license::{LicenseCheck, LicenseFile, LicenseFileProbe, LicenseProbe, LicenseStatus};
pub use reporter::{OutputFormat, RequirementsReport};
pub use writable::WritableCheck;
