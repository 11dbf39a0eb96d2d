//! Common test infrastructure for hoist-update tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Version strings and batch sizes
//! - `builders`: Update info and installed extension set builders
//! - `mocks`: Lifecycle, oracle, handler and reloader doubles
//! - `mock_server`: Wiremock setup for the releases API
//! - `assertions`: Semantic assertions on step outcomes and errors

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod assertions;
pub mod builders;
pub mod constants;
pub mod mock_server;
pub mod mocks;

pub use assertions::*;
pub use builders::*;
pub use constants::*;
pub use mock_server::*;
pub use mocks::*;
