//! # hoist-core
//!
//! Core library for hoist providing:
//! - The update data model (update info, extension records, step outcomes)
//! - Runtime configuration with hierarchical loading
//! - The shared error type

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use utils::get_home_dir;
