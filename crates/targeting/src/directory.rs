//! Peer directory built from network configuration.
//!
//! Every peer listed by an organization is attributed to that organization's
//! MSP. Peers that appear only in the `peers` section carry an empty MSP
//! identifier, so no organization filter accepts them. Addresses go through
//! the peer entity matchers: a peer's name is tried first, then its configured
//! URL. A matching rule marked `ignoreEndpoint` drops the peer.

use crate::error::TargetingError;
use crate::filter::TargetFilter;
use crate::matcher::{first_match, EntityMatcher};
use crate::peer::PeerInfo;
use corelib::NetworkConfig;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct PeerDirectory {
    peers: Vec<PeerInfo>,
}

impl PeerDirectory {
    pub fn new(peers: Vec<PeerInfo>) -> Self {
        Self { peers }
    }

    pub fn from_config(config: &NetworkConfig) -> Result<Self, TargetingError> {
        let matchers = EntityMatcher::compile_all(&config.entity_matchers.peer)?;

        // peer name -> (org, msp)
        let mut owners: BTreeMap<&str, (&str, &str)> = BTreeMap::new();
        for (org, org_config) in &config.organizations {
            let msp = org_config.mspid.as_deref().unwrap_or_default();
            for peer in &org_config.peers {
                owners.entry(peer.as_str()).or_insert((org.as_str(), msp));
            }
        }

        let mut names: Vec<&str> = config.peers.keys().map(String::as_str).collect();
        for name in owners.keys().copied() {
            if !config.peers.contains_key(name) {
                names.push(name);
            }
        }

        let mut peers = Vec::with_capacity(names.len());
        for name in names {
            let configured = config
                .peers
                .get(name)
                .and_then(|p| p.url.as_deref())
                .unwrap_or(name);
            let matched = first_match(&matchers, name).or_else(|| first_match(&matchers, configured));

            let mut url = configured.to_string();
            if let Some(hit) = matched {
                if hit.ignored {
                    debug!(peer = name, "peer ignored by entity matcher");
                    continue;
                }
                if let Some(mapped) = hit.url {
                    url = mapped;
                } else if let Some(host) = hit.mapped_host.as_deref() {
                    if let Some(mapped) = config.peers.get(host).and_then(|p| p.url.as_deref()) {
                        url = mapped.to_string();
                    }
                }
            }

            let mut info = PeerInfo::new(name, url, "");
            if let Some((org, msp)) = owners.get(name) {
                info.msp_id = msp.to_string();
                info.org = Some(org.to_string());
            }
            peers.push(info);
        }

        debug!(peers = peers.len(), "built peer directory");
        Ok(Self { peers })
    }

    pub fn peers(&self) -> &[PeerInfo] {
        &self.peers
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Peer addressed by `endpoint` (name or URL).
    pub fn find(&self, endpoint: &str) -> Option<&PeerInfo> {
        self.peers.iter().find(|p| p.answers_to(endpoint))
    }

    /// Peers accepted by `filter`.
    pub fn filtered<'a>(&'a self, filter: &'a dyn TargetFilter) -> impl Iterator<Item = &'a PeerInfo> + 'a {
        self.peers.iter().filter(move |p| filter.accept(*p))
    }
}
