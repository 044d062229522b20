//! Peer abstractions.
//!
//! A peer is a ledger node that endorses or answers queries. Filters only need
//! its identity: a name, a reachable URL and the MSP of the organization it
//! belongs to.

use std::fmt;

/// Identity of a peer as reported by the transport.
pub trait Peer {
    /// Logical name from the network configuration.
    fn name(&self) -> &str;
    /// Address the transport dials.
    fn url(&self) -> &str;
    /// MSP identifier of the owning organization; empty when unknown.
    fn msp_id(&self) -> &str;
}

/// Peer entry of a [`PeerDirectory`](crate::PeerDirectory).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PeerInfo {
    pub name: String,
    pub url: String,
    pub msp_id: String,
    /// Organization that lists this peer, if any.
    pub org: Option<String>,
}

impl PeerInfo {
    pub fn new(name: impl Into<String>, url: impl Into<String>, msp_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            msp_id: msp_id.into(),
            org: None,
        }
    }

    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    /// True when `endpoint` names this peer by name or by URL.
    pub fn answers_to(&self, endpoint: &str) -> bool {
        self.name == endpoint || self.url == endpoint
    }
}

impl Peer for PeerInfo {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn msp_id(&self) -> &str {
        &self.msp_id
    }
}

impl fmt::Display for PeerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.url, self.msp_id)
    }
}
