//! Ledger client: connection caching and transaction dispatch.
//!
//! This crate sits between workflow code and a ledger SDK:
//! - `ClientRegistry` caches one channel client per identity
//! - `TransactionDispatcher` issues invoke/query calls with per-call options
//! - `TransactionService` turns loosely shaped request input into a call and
//!   a normalized `{code, message, result}` output
//! - `CertificateService` reads a participant's signing certificate
//!
//! The SDK itself is reached through the [`transport`] traits.

pub mod cert;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod request;
pub mod spec;
pub mod transport;

pub use cert::{CertificateError, CertificateService};
pub use dispatcher::{RequestType, TransactionDispatcher, TransactionResult, FAILURE_STATUS};
pub use error::{ClientError, Result};
pub use registry::{CachedClient, ClientRegistry};
pub use request::{Parameter, RequestFailure, RequestInput, RequestOutput, RequestSettings, TransactionService};
pub use spec::{CallOptions, ClientKey, ConnectorSpec};
pub use transport::{
    ChaincodeResponse, ChannelClient, Connector, RequestOptions, RetryPolicy, Session, TransactionRequest,
    TransportError,
};
