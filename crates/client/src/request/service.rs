use super::input::{RequestFailure, RequestInput, RequestOutput};
use super::settings::{Parameter, RequestSettings};
use crate::dispatcher::{TransactionDispatcher, TransactionResult};
use crate::registry::ClientRegistry;
use crate::spec::ConnectorSpec;
use crate::transport::TransactionRequest;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Message reported when the ledger rejected or failed a transaction.
pub const TRANSACTION_FAILED: &str = "Fabric request returned error";

/// Message reported for an empty payload.
pub const NO_DATA: &str = "No data returned";

/// Executes one configured chaincode transaction per request.
#[derive(Debug, Clone)]
pub struct TransactionService {
    settings: RequestSettings,
    registry: Arc<ClientRegistry>,
    dispatcher: TransactionDispatcher,
}

impl TransactionService {
    pub fn new(settings: RequestSettings, registry: Arc<ClientRegistry>) -> Self {
        debug!(
            connection = %settings.connection_name,
            channel = %settings.channel_id,
            chaincode = %settings.chaincode_id,
            transaction = %settings.transaction_name,
            kind = %settings.request_type,
            "request service created"
        );
        Self {
            settings,
            registry,
            dispatcher: TransactionDispatcher::default(),
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: TransactionDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn settings(&self) -> &RequestSettings {
        &self.settings
    }

    pub fn connector_spec(&self, input: &RequestInput) -> ConnectorSpec {
        ConnectorSpec::new(
            self.settings.connection_name.clone(),
            input.identity(),
            self.settings.channel_id.clone(),
        )
        .with_timeout_millis(input.timeout_millis)
        .with_endpoints(input.endpoints.clone())
        .with_user_org_only(self.settings.user_org_only)
    }

    /// Runs the transaction for `input`.
    ///
    /// Client setup failures report `{500, <error text>}`; transport failures
    /// report `{500, "Fabric request returned error"}`. Both also carry the
    /// underlying error.
    pub async fn execute(&self, input: &RequestInput) -> Result<RequestOutput, RequestFailure> {
        let spec = self.connector_spec(input);
        let client = self.registry.get_or_create(&spec).await.map_err(|e| {
            error!(error = %e, "failed to obtain ledger client");
            RequestFailure::from_error(e)
        })?;

        let request = TransactionRequest::new(&self.settings.chaincode_id, &self.settings.transaction_name)
            .with_args(prepare_arguments(&self.settings.arguments, &input.parameters))
            .with_transient(prepare_transient(input.transient.as_ref()));

        let TransactionResult { payload, status, error } = self
            .dispatcher
            .dispatch(self.settings.request_type, &client, &request, &spec.call_options())
            .await;
        if let Some(error) = error {
            return Err(RequestFailure::new(RequestOutput::failure(TRANSACTION_FAILED), error));
        }

        debug!(status, payload = %String::from_utf8_lossy(&payload), "ledger response");
        Ok(normalize(&payload, status))
    }
}

/// Builds the positional argument list from declared parameters.
///
/// Strings are passed verbatim, other values as JSON text, and missing or
/// null values as empty strings.
pub fn prepare_arguments(params: &[Parameter], values: &Map<String, Value>) -> Vec<Vec<u8>> {
    params
        .iter()
        .map(|param| {
            let arg = match values.get(&param.name) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(text)) => text.clone(),
                Some(other) => other.to_string(),
            };
            debug!(name = %param.name, value = %arg, "chaincode argument");
            arg.into_bytes()
        })
        .collect()
}

/// JSON-encodes each transient value.
pub fn prepare_transient(values: Option<&Map<String, Value>>) -> HashMap<String, Vec<u8>> {
    let Some(values) = values else {
        debug!("no transient data specified");
        return HashMap::new();
    };
    values
        .iter()
        .filter_map(|(key, value)| match serde_json::to_vec(value) {
            Ok(bytes) => Some((key.clone(), bytes)),
            Err(e) => {
                warn!(key = %key, error = %e, "failed to encode transient value");
                None
            }
        })
        .collect()
}

/// Normalizes a chaincode response into `{code, message, result}`.
pub fn normalize(payload: &[u8], status: i32) -> RequestOutput {
    let text = String::from_utf8_lossy(payload);
    let result = if status < 300 && !payload.is_empty() {
        match serde_json::from_slice::<Value>(payload) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "response is not JSON, returning raw text");
                Some(Value::String(text.to_string()))
            }
        }
    } else {
        None
    };
    let message = if payload.is_empty() {
        NO_DATA.to_string()
    } else {
        text.into_owned()
    };
    RequestOutput {
        code: status,
        message,
        result,
    }
}
