//! Per-request input and normalized output.

use crate::error::ClientError;
use corelib::Identity;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Values supplied with each request.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestInput {
    /// `user` or `user@org`
    pub user_name: String,
    pub parameters: Map<String, Value>,
    pub transient: Option<Map<String, Value>>,
    /// 0 leaves the transport's default timeout.
    pub timeout_millis: u64,
    #[serde(deserialize_with = "endpoint_list")]
    pub endpoints: Vec<String>,
}

impl RequestInput {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Default::default()
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_transient(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.transient
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_timeout_millis(mut self, timeout_millis: u64) -> Self {
        self.timeout_millis = timeout_millis;
        self
    }

    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = normalize_endpoints(endpoints.into_iter().map(Into::into));
        self
    }

    pub fn identity(&self) -> Identity {
        Identity::parse(&self.user_name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn endpoint_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let endpoints = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(endpoint)) => vec![endpoint],
        Some(OneOrMany::Many(endpoints)) => endpoints,
    };
    Ok(normalize_endpoints(endpoints))
}

fn normalize_endpoints(endpoints: impl IntoIterator<Item = String>) -> Vec<String> {
    endpoints
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Normalized result of a request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOutput {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl RequestOutput {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: crate::dispatcher::FAILURE_STATUS,
            message: message.into(),
            result: None,
        }
    }
}

/// A failed request: the output to report plus the cause.
#[derive(Debug, Error)]
#[error("{}", .output.message)]
pub struct RequestFailure {
    pub output: RequestOutput,
    #[source]
    pub error: ClientError,
}

impl RequestFailure {
    pub fn new(output: RequestOutput, error: ClientError) -> Self {
        Self { output, error }
    }

    /// Failure whose output message is the error text.
    pub fn from_error(error: ClientError) -> Self {
        Self::new(RequestOutput::failure(error.to_string()), error)
    }
}
