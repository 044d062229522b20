//! Transport seam to the ledger SDK.
//!
//! Endorsement, ordering and commit are the SDK's business. This module only
//! fixes the shape of the conversation:
//!
//! 1. a [`Connector`] opens an identity-scoped [`Session`] from the network
//!    configuration
//! 2. the session binds a channel-scoped [`ChannelClient`]
//! 3. the channel client executes or queries with per-request
//!    [`RequestOptions`]
//!
//! Implementations backed by blocking I/O should move that work onto
//! `tokio::task::spawn_blocking` so request tasks stay responsive.

use async_trait::async_trait;
use corelib::{Identity, NetworkConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use targeting::Targets;
use thiserror::Error;

/// Errors reported by the SDK.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No peer could be reached or none matched the targets
    #[error("no available peers: {0}")]
    Unavailable(String),

    /// The request exceeded its timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Chaincode rejected the transaction
    #[error("chaincode status {status}: {message}")]
    Chaincode { status: i32, message: String },

    /// The identity is not enrolled or its credentials are unusable
    #[error("identity {0} is not usable")]
    Identity(String),

    /// Any other SDK failure
    #[error("{0}")]
    Other(String),
}

/// Invoke or query request.
///
/// `args` must follow the transaction's declared parameter order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionRequest {
    pub chaincode_id: String,
    pub function: String,
    pub args: Vec<Vec<u8>>,
    pub transient: HashMap<String, Vec<u8>>,
}

impl TransactionRequest {
    pub fn new(chaincode_id: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            chaincode_id: chaincode_id.into(),
            function: function.into(),
            ..Default::default()
        }
    }

    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Vec<u8>>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_transient(mut self, transient: HashMap<String, Vec<u8>>) -> Self {
        self.transient = transient;
        self
    }
}

/// Raw chaincode response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChaincodeResponse {
    pub payload: Vec<u8>,
    /// Chaincode status; below 300 is success-like. Not an HTTP status.
    pub status: i32,
    pub tx_id: Option<String>,
}

/// Retry policy handed to the SDK with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based), capped at `max_backoff`.
    /// A NaN delay is capped too; a negative one means no delay.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31) as i32;
        let delay = self.initial_backoff.as_secs_f64() * self.backoff_factor.powi(exp);
        Duration::try_from_secs_f64(delay.min(self.max_backoff.as_secs_f64())).unwrap_or(Duration::ZERO)
    }
}

/// Options for one invoke or query.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub retry: RetryPolicy,
    /// `None` leaves the SDK's default timeout in place.
    pub timeout: Option<Duration>,
    pub targets: Targets,
}

/// Opens identity-scoped sessions.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn session(
        &self,
        config: Arc<NetworkConfig>,
        identity: &Identity,
    ) -> Result<Arc<dyn Session>, TransportError>;
}

/// Identity-scoped SDK context.
#[async_trait]
pub trait Session: Send + Sync + 'static {
    /// Binds a client to `channel_id`.
    async fn channel(&self, channel_id: &str) -> Result<Arc<dyn ChannelClient>, TransportError>;
}

/// Channel-scoped client.
#[async_trait]
pub trait ChannelClient: Send + Sync + 'static {
    /// Submits a state-changing transaction.
    async fn execute(
        &self,
        request: &TransactionRequest,
        options: &RequestOptions,
    ) -> Result<ChaincodeResponse, TransportError>;

    /// Evaluates a read-only transaction on the targeted peers.
    async fn query(
        &self,
        request: &TransactionRequest,
        options: &RequestOptions,
    ) -> Result<ChaincodeResponse, TransportError>;
}
