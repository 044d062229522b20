//! Invoke and query dispatch.

use crate::error::ClientError;
use crate::registry::CachedClient;
use crate::spec::CallOptions;
use crate::transport::{RequestOptions, RetryPolicy, TransactionRequest};
use serde::{Deserialize, Serialize};
use std::fmt;
use targeting::Targets;
use tracing::{debug, error};

/// Status reported when the transport itself failed.
pub const FAILURE_STATUS: i32 = 500;

/// Kind of ledger call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    #[default]
    Invoke,
    Query,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::Invoke => f.write_str("invoke"),
            RequestType::Query => f.write_str("query"),
        }
    }
}

/// Outcome of one call.
#[derive(Debug)]
pub struct TransactionResult {
    pub payload: Vec<u8>,
    pub status: i32,
    pub error: Option<ClientError>,
}

impl TransactionResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.status < 300
    }
}

/// Issues calls on cached clients with per-call options.
#[derive(Debug, Clone, Default)]
pub struct TransactionDispatcher {
    retry: RetryPolicy,
}

impl TransactionDispatcher {
    pub fn new(retry: RetryPolicy) -> Self {
        Self { retry }
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Options for one call: the retry policy, a timeout when one was
    /// requested, and targets (explicit endpoints over the client's filter).
    pub fn request_options(&self, client: &CachedClient, call: &CallOptions) -> RequestOptions {
        RequestOptions {
            retry: self.retry.clone(),
            timeout: call.timeout(),
            targets: Targets::compose(&call.endpoints, client.filter()),
        }
    }

    pub async fn invoke(
        &self,
        client: &CachedClient,
        request: &TransactionRequest,
        call: &CallOptions,
    ) -> TransactionResult {
        self.dispatch(RequestType::Invoke, client, request, call).await
    }

    pub async fn query(
        &self,
        client: &CachedClient,
        request: &TransactionRequest,
        call: &CallOptions,
    ) -> TransactionResult {
        self.dispatch(RequestType::Query, client, request, call).await
    }

    pub async fn dispatch(
        &self,
        kind: RequestType,
        client: &CachedClient,
        request: &TransactionRequest,
        call: &CallOptions,
    ) -> TransactionResult {
        let options = self.request_options(client, call);
        debug!(
            client = %client.key(),
            %kind,
            chaincode = %request.chaincode_id,
            function = %request.function,
            timeout = ?options.timeout,
            targets = ?options.targets,
            "dispatching transaction"
        );

        let outcome = match kind {
            RequestType::Invoke => client.channel().execute(request, &options).await,
            RequestType::Query => client.channel().query(request, &options).await,
        };

        match outcome {
            Ok(response) => TransactionResult {
                payload: response.payload,
                status: response.status,
                error: None,
            },
            Err(source) => {
                error!(
                    %kind,
                    chaincode = %request.chaincode_id,
                    function = %request.function,
                    error = %source,
                    "transaction failed"
                );
                TransactionResult {
                    payload: Vec::new(),
                    status: FAILURE_STATUS,
                    error: Some(ClientError::Transaction {
                        chaincode: request.chaincode_id.clone(),
                        function: request.function.clone(),
                        source,
                    }),
                }
            }
        }
    }
}
