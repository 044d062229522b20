//! Typed network configuration.
//!
//! Mirrors the YAML connection profile consumed by ledger SDKs. Every section
//! is optional so that partial documents (such as an entity-matcher override)
//! deserialize into the same type.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// A full or partial network configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    pub client: ClientConfig,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub channels: BTreeMap<String, ChannelConfig>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub organizations: BTreeMap<String, OrganizationConfig>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub orderers: BTreeMap<String, EndpointConfig>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub peers: BTreeMap<String, EndpointConfig>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub certificate_authorities: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "EntityMatchers::is_empty")]
    pub entity_matchers: EntityMatchers,
    /// Keys not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NetworkConfig {
    /// Parses a YAML document.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_slice(bytes)
    }

    /// Renders the document back to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// The client's default organization (`client.organization`).
    pub fn default_organization(&self) -> Option<&str> {
        self.client.organization.as_deref().filter(|o| !o.is_empty())
    }

    pub fn organization(&self, name: &str) -> Option<&OrganizationConfig> {
        self.organizations.get(name)
    }

    /// MSP identifier of organization `name`, if it declares one.
    pub fn msp_id(&self, name: &str) -> Option<&str> {
        self.organization(name)
            .and_then(|org| org.mspid.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Root directory for relative credential paths (`client.cryptoconfig.path`).
    pub fn crypto_root(&self) -> Option<&str> {
        self.client
            .cryptoconfig
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
    }
}

/// The `client` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<Value>,
    #[serde(skip_serializing_if = "CryptoConfig::is_empty")]
    pub cryptoconfig: CryptoConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_store: Option<Value>,
    #[serde(rename = "BCCSP", skip_serializing_if = "Option::is_none")]
    pub bccsp: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_certs: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `client.cryptoconfig`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CryptoConfig {
    pub fn is_empty(&self) -> bool {
        self.path.is_none()
    }
}

/// An entry of the `organizations` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mspid: Option<String>,
    /// Credential directory template; `{username}` is replaced per user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crypto_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub orderers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificate_authorities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// An entry of the `peers` or `orderers` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_url: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub grpc_options: BTreeMap<String, Value>,
    #[serde(rename = "tlsCACerts", skip_serializing_if = "TlsCertConfig::is_empty")]
    pub tls_ca_certs: TlsCertConfig,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsCertConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pem: Option<String>,
}

impl TlsCertConfig {
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.pem.is_none()
    }
}

/// An entry of the `channels` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub peers: BTreeMap<String, ChannelPeerConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub orderers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policies: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Roles a peer plays on one channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelPeerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endorsing_peer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chaincode_query: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_query: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_source: Option<bool>,
}

/// The `entityMatchers` section: rules mapping logical addresses to
/// physical endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityMatchers {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub peer: Vec<EntityMatcherConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub orderer: Vec<EntityMatcherConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificate_authority: Vec<EntityMatcherConfig>,
}

impl EntityMatchers {
    pub fn is_empty(&self) -> bool {
        self.peer.is_empty() && self.orderer.is_empty() && self.certificate_authority.is_empty()
    }
}

/// One entity-matcher rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityMatcherConfig {
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_substitution_exp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_target_override_url_substitution_exp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_endpoint: Option<bool>,
}
