//! Error types for the client.

use crate::transport::TransportError;
use thiserror::Error;

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that abort a ledger request.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network configuration missing or unusable
    #[error("configuration error: {0}")]
    Configuration(#[from] corelib::Error),

    /// Session or channel binding could not be created
    #[error("{context}: {source}")]
    Connection {
        context: String,
        #[source]
        source: TransportError,
    },

    /// Request carries no usable identity
    #[error("{0}")]
    Identity(String),

    /// Invoke or query failed in the transport
    #[error("transaction {function} of chaincode {chaincode} failed: {source}")]
    Transaction {
        chaincode: String,
        function: String,
        #[source]
        source: TransportError,
    },
}
