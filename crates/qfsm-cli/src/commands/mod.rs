//! CLI command implementations.

pub mod backends;
pub mod build;
pub mod common;
pub mod run;
pub mod verify;
pub mod version;
