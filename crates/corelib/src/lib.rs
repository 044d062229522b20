//! Core library for ledger network connectivity.
//!
//! This crate provides the configuration side of a ledger client:
//! - Typed network configuration documents
//! - Layered composition of a base document with an entity-matcher override
//! - `${VAR}` placeholder substitution for file paths
//! - Participant identities (`user` / `user@org`)

pub mod config;
pub mod env;
pub mod error;
pub mod identity;
pub mod settings;

pub use config::{ComposedConfig, ConfigLayer, LayerOrigin, Merge, NetworkConfig, OrganizationConfig};
pub use error::{Error, Result};
pub use identity::Identity;
pub use settings::NetworkSettings;
