//! Raw network settings as supplied by the hosting process.

use crate::config::ComposedConfig;
use crate::env;
use crate::error::Result;
use tracing::{info, warn};

/// The two configuration documents, kept as raw bytes until composition.
#[derive(Clone, Debug, Default)]
pub struct NetworkSettings {
    pub network: Vec<u8>,
    pub entity_matchers: Vec<u8>,
}

impl NetworkSettings {
    pub fn new(network: impl Into<Vec<u8>>, entity_matchers: impl Into<Vec<u8>>) -> Self {
        Self {
            network: network.into(),
            entity_matchers: entity_matchers.into(),
        }
    }

    /// Loads the network document and, optionally, the entity-matcher
    /// document. Both paths go through `${VAR}` substitution. A matcher file
    /// that cannot be read is logged and skipped.
    pub fn from_files(network_path: &str, matchers_path: Option<&str>) -> Result<Self> {
        let network = env::read_file(network_path)?;
        info!(path = network_path, bytes = network.len(), "loaded network config");

        let entity_matchers = match matchers_path.filter(|p| !p.is_empty()) {
            Some(path) => match env::read_file(path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(path, error = %err, "failed to read entity matchers");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self {
            network,
            entity_matchers,
        })
    }

    pub fn compose(&self) -> Result<ComposedConfig> {
        ComposedConfig::compose(&self.network, &self.entity_matchers)
    }
}
