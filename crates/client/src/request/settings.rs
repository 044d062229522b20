//! Static request settings: which chaincode transaction to call and how.

use crate::dispatcher::RequestType;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// JSON type of a declared parameter, inferred from its example value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JsonType {
    #[default]
    String,
    Boolean,
    Number,
    Integer,
}

impl JsonType {
    /// `true`/`false` (any case) is boolean, digits followed by a dot is a
    /// number, any other digits make an integer, everything else a string.
    pub fn infer(example: &str) -> Self {
        if example.eq_ignore_ascii_case("true") || example.eq_ignore_ascii_case("false") {
            JsonType::Boolean
        } else if has_decimal(example) {
            JsonType::Number
        } else if example.bytes().any(|b| b.is_ascii_digit()) {
            JsonType::Integer
        } else {
            JsonType::String
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Boolean => "boolean",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
        }
    }
}

fn has_decimal(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.windows(2).any(|w| w[0].is_ascii_digit() && w[1] == b'.')
}

/// A declared transaction parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub json_type: JsonType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, json_type: JsonType) -> Self {
        Self {
            name: name.into(),
            json_type,
        }
    }

    /// Parses a comma-separated declaration such as `"id, qty:5, flag:true"`.
    /// Order is preserved; entries without a name are skipped.
    pub fn parse_list(text: &str) -> Vec<Parameter> {
        text.trim()
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.trim().split(':');
                let name = parts.next().unwrap_or_default().trim();
                if name.is_empty() {
                    return None;
                }
                let example = parts.next().unwrap_or_default().trim();
                Some(Parameter::new(name, JsonType::infer(example)))
            })
            .collect()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.name, self.json_type.as_str())
    }
}

/// Settings fixed when a request service is created.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestSettings {
    pub connection_name: String,
    #[serde(rename = "channelID")]
    pub channel_id: String,
    #[serde(rename = "chaincodeID")]
    pub chaincode_id: String,
    pub transaction_name: String,
    #[serde(rename = "parameters", deserialize_with = "parameter_list")]
    pub arguments: Vec<Parameter>,
    pub request_type: RequestType,
    pub user_org_only: bool,
}

impl RequestSettings {
    pub fn new(
        connection_name: impl Into<String>,
        channel_id: impl Into<String>,
        chaincode_id: impl Into<String>,
        transaction_name: impl Into<String>,
        request_type: RequestType,
    ) -> Self {
        Self {
            connection_name: connection_name.into(),
            channel_id: channel_id.into(),
            chaincode_id: chaincode_id.into(),
            transaction_name: transaction_name.into(),
            request_type,
            ..Default::default()
        }
    }

    pub fn with_parameters(mut self, declaration: &str) -> Self {
        self.arguments = Parameter::parse_list(declaration);
        self
    }

    pub fn with_user_org_only(mut self, user_org_only: bool) -> Self {
        self.user_org_only = user_org_only;
        self
    }
}

fn parameter_list<'de, D>(deserializer: D) -> Result<Vec<Parameter>, D::Error>
where
    D: Deserializer<'de>,
{
    let declaration = Option::<String>::deserialize(deserializer)?;
    Ok(declaration.as_deref().map(Parameter::parse_list).unwrap_or_default())
}
