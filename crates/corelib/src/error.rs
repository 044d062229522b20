//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or composing network configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// No network configuration has been installed yet
    #[error("network configuration is not initialized")]
    Uninitialized,
    /// Network configuration was installed twice
    #[error("network configuration is already initialized")]
    AlreadyInitialized,
    /// Base network configuration document is empty
    #[error("network configuration is empty")]
    EmptyConfig,
    /// Base network configuration document does not parse
    #[error("failed to parse network configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Configuration file could not be read
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
