//! CLI command implementations

pub mod check;
pub mod compat;
pub mod extension;
pub mod prepare;
pub mod reactivate;
pub mod requirements;
pub mod version;
