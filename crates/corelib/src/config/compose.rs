//! Layered configuration composition.
//!
//! A composed configuration presents its layers in precedence order: the
//! entity-matcher override first (when it parsed), then the base network
//! document. Resolution is first-match-wins over that order, which is what
//! `resolved()` materializes once at composition time.
//!
//! # Failure policy
//!
//! - base document missing or unparsable: fatal, `Error::EmptyConfig` / `Error::Parse`
//! - override document unparsable: logged, composition continues base-only

use super::merge::Merge;
use super::network::NetworkConfig;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a configuration layer came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerOrigin {
    /// The entity-matcher override document.
    Override,
    /// The base network configuration document.
    Base,
}

impl fmt::Display for LayerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerOrigin::Override => f.write_str("override"),
            LayerOrigin::Base => f.write_str("base"),
        }
    }
}

/// One parsed document within a composed configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigLayer {
    pub origin: LayerOrigin,
    pub config: NetworkConfig,
}

/// Base configuration with an optional override layered over it.
#[derive(Clone, Debug)]
pub struct ComposedConfig {
    /// Highest precedence first.
    layers: Vec<ConfigLayer>,
    resolved: Arc<NetworkConfig>,
}

impl ComposedConfig {
    /// Composes `base` with `overlay`. An empty `overlay` means base-only.
    pub fn compose(base: &[u8], overlay: &[u8]) -> Result<Self> {
        if is_blank(base) {
            return Err(Error::EmptyConfig);
        }
        let base = NetworkConfig::from_yaml(base)?;

        let mut layers = Vec::with_capacity(2);
        if !is_blank(overlay) {
            match NetworkConfig::from_yaml(overlay) {
                Ok(config) => layers.push(ConfigLayer {
                    origin: LayerOrigin::Override,
                    config,
                }),
                Err(err) => {
                    warn!(error = %err, "failed to parse entity matchers, using network config only");
                }
            }
        }
        layers.push(ConfigLayer {
            origin: LayerOrigin::Base,
            config: base,
        });

        Ok(Self::from_layers(layers))
    }

    /// Builds a composed configuration from already-parsed layers, highest
    /// precedence first.
    pub fn from_layers(layers: Vec<ConfigLayer>) -> Self {
        let mut resolved = NetworkConfig::default();
        for layer in layers.iter().rev() {
            resolved.merge(layer.config.clone());
        }
        debug!(
            layers = layers.len(),
            organizations = resolved.organizations.len(),
            peers = resolved.peers.len(),
            "composed network configuration"
        );
        Self {
            layers,
            resolved: Arc::new(resolved),
        }
    }

    /// Layers in precedence order.
    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }

    /// True when an override layer took part in composition.
    pub fn has_override(&self) -> bool {
        self.layers.iter().any(|l| l.origin == LayerOrigin::Override)
    }

    /// The effective configuration.
    pub fn resolved(&self) -> &NetworkConfig {
        &self.resolved
    }

    /// Shared handle to the effective configuration.
    pub fn shared(&self) -> Arc<NetworkConfig> {
        Arc::clone(&self.resolved)
    }

    /// First-match-wins lookup of an organization's MSP identifier, along
    /// with the layer that supplied it.
    pub fn lookup_msp_id(&self, org: &str) -> Option<(&str, LayerOrigin)> {
        self.layers
            .iter()
            .find_map(|layer| layer.config.msp_id(org).map(|id| (id, layer.origin)))
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}
