//! Typed override merge.
//!
//! `base.merge(overlay)` folds an overlay document into a base document with
//! the overlay winning every collision:
//!
//! - optional scalars take the overlay value when it is present
//! - keyed sections merge entry by entry, recursively
//! - lists are replaced wholesale by a non-empty overlay list
//! - free-form YAML values merge mapping keys recursively and otherwise replace

use super::network::{
    ChannelConfig, ChannelPeerConfig, ClientConfig, CryptoConfig, EndpointConfig, EntityMatchers,
    NetworkConfig, OrganizationConfig, TlsCertConfig,
};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Folds a higher-precedence value into `self`.
pub trait Merge {
    fn merge(&mut self, overlay: Self);
}

impl<T> Merge for Option<T> {
    fn merge(&mut self, overlay: Self) {
        if overlay.is_some() {
            *self = overlay;
        }
    }
}

impl<T> Merge for Vec<T> {
    fn merge(&mut self, overlay: Self) {
        if !overlay.is_empty() {
            *self = overlay;
        }
    }
}

impl<V: Merge> Merge for BTreeMap<String, V> {
    fn merge(&mut self, overlay: Self) {
        for (key, value) in overlay {
            match self.get_mut(&key) {
                Some(existing) => Merge::merge(existing, value),
                None => {
                    self.insert(key, value);
                }
            }
        }
    }
}

impl Merge for Value {
    fn merge(&mut self, overlay: Self) {
        match (self, overlay) {
            (Value::Mapping(base), Value::Mapping(over)) => {
                for (key, value) in over {
                    match base.get_mut(&key) {
                        Some(existing) => Merge::merge(existing, value),
                        None => {
                            base.insert(key, value);
                        }
                    }
                }
            }
            (_, Value::Null) => {}
            (slot, value) => *slot = value,
        }
    }
}

impl Merge for NetworkConfig {
    fn merge(&mut self, overlay: Self) {
        Merge::merge(&mut self.version, overlay.version);
        Merge::merge(&mut self.client, overlay.client);
        Merge::merge(&mut self.channels, overlay.channels);
        Merge::merge(&mut self.organizations, overlay.organizations);
        Merge::merge(&mut self.orderers, overlay.orderers);
        Merge::merge(&mut self.peers, overlay.peers);
        Merge::merge(&mut self.certificate_authorities, overlay.certificate_authorities);
        Merge::merge(&mut self.entity_matchers, overlay.entity_matchers);
        Merge::merge(&mut self.extra, overlay.extra);
    }
}

impl Merge for ClientConfig {
    fn merge(&mut self, overlay: Self) {
        Merge::merge(&mut self.organization, overlay.organization);
        Merge::merge(&mut self.logging, overlay.logging);
        Merge::merge(&mut self.cryptoconfig, overlay.cryptoconfig);
        Merge::merge(&mut self.credential_store, overlay.credential_store);
        Merge::merge(&mut self.bccsp, overlay.bccsp);
        Merge::merge(&mut self.tls_certs, overlay.tls_certs);
        Merge::merge(&mut self.extra, overlay.extra);
    }
}

impl Merge for CryptoConfig {
    fn merge(&mut self, overlay: Self) {
        Merge::merge(&mut self.path, overlay.path);
    }
}

impl Merge for OrganizationConfig {
    fn merge(&mut self, overlay: Self) {
        Merge::merge(&mut self.mspid, overlay.mspid);
        Merge::merge(&mut self.crypto_path, overlay.crypto_path);
        Merge::merge(&mut self.peers, overlay.peers);
        Merge::merge(&mut self.orderers, overlay.orderers);
        Merge::merge(&mut self.certificate_authorities, overlay.certificate_authorities);
        Merge::merge(&mut self.users, overlay.users);
        Merge::merge(&mut self.extra, overlay.extra);
    }
}

impl Merge for EndpointConfig {
    fn merge(&mut self, overlay: Self) {
        Merge::merge(&mut self.url, overlay.url);
        Merge::merge(&mut self.event_url, overlay.event_url);
        Merge::merge(&mut self.grpc_options, overlay.grpc_options);
        Merge::merge(&mut self.tls_ca_certs, overlay.tls_ca_certs);
        Merge::merge(&mut self.extra, overlay.extra);
    }
}

impl Merge for TlsCertConfig {
    fn merge(&mut self, overlay: Self) {
        Merge::merge(&mut self.path, overlay.path);
        Merge::merge(&mut self.pem, overlay.pem);
    }
}

impl Merge for ChannelConfig {
    fn merge(&mut self, overlay: Self) {
        Merge::merge(&mut self.peers, overlay.peers);
        Merge::merge(&mut self.orderers, overlay.orderers);
        Merge::merge(&mut self.policies, overlay.policies);
        Merge::merge(&mut self.extra, overlay.extra);
    }
}

impl Merge for ChannelPeerConfig {
    fn merge(&mut self, overlay: Self) {
        Merge::merge(&mut self.endorsing_peer, overlay.endorsing_peer);
        Merge::merge(&mut self.chaincode_query, overlay.chaincode_query);
        Merge::merge(&mut self.ledger_query, overlay.ledger_query);
        Merge::merge(&mut self.event_source, overlay.event_source);
    }
}

impl Merge for EntityMatchers {
    fn merge(&mut self, overlay: Self) {
        Merge::merge(&mut self.peer, overlay.peer);
        Merge::merge(&mut self.orderer, overlay.orderer);
        Merge::merge(&mut self.certificate_authority, overlay.certificate_authority);
    }
}
