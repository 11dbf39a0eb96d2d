//! Type definitions for hoist

mod registry_types;
mod runtime_config;
mod update_types;

pub use registry_types::*;
pub use runtime_config::*;
pub use update_types::*;
