//! CLI tool for inspecting ledger connection profiles.
//!
//! Provides commands for:
//! - Validating a network configuration and its entity-matcher override
//! - Listing peers, optionally restricted to one organization
//! - Printing a user's signing certificate
//! - Printing the composed configuration

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
