//! Shared constants for test infrastructure

pub const CURRENT_VERSION: &str = "1.4.0";
pub const TARGET_VERSION: &str = "2.0.0";
pub const OLDER_VERSION: &str = "1.3.9";

pub const TAG_TARGET: &str = "v2.0.0";

/// Requirement no `OLD_EXTENSION_VERSION` satisfies
pub const TARGET_REQUIREMENT: &str = "^2.0.0";
pub const OLD_EXTENSION_VERSION: &str = "1.0.0";
pub const NEW_EXTENSION_VERSION: &str = "2.1.0";

pub const BATCH_SIZE: usize = 50;
