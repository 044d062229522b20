//! Cache of channel clients, one per identity.
//!
//! The registry owns the composed network configuration (set exactly once) and
//! a map from [`ClientKey`] to a lazily initialized slot. Concurrent requests
//! for the same key share one slot, so the session and channel binding are
//! built once. A failed build removes its slot, so the next caller starts
//! over and the map only ever holds keys that built a client. Built entries
//! are never evicted.

use crate::error::{ClientError, Result};
use crate::spec::{ClientKey, ConnectorSpec};
use crate::transport::{ChannelClient, Connector, Session};
use corelib::{ComposedConfig, Identity, NetworkSettings};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use targeting::{org_filter, TargetFilter};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// A channel-bound client and the organization filter fixed at creation.
pub struct CachedClient {
    key: ClientKey,
    identity: Identity,
    channel_id: String,
    session: Arc<dyn Session>,
    channel: Arc<dyn ChannelClient>,
    filter: Option<Arc<dyn TargetFilter>>,
}

impl CachedClient {
    pub fn key(&self) -> &ClientKey {
        &self.key
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Channel bound when the client was first created.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    pub fn channel(&self) -> &Arc<dyn ChannelClient> {
        &self.channel
    }

    pub fn filter(&self) -> Option<&Arc<dyn TargetFilter>> {
        self.filter.as_ref()
    }
}

impl fmt::Debug for CachedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedClient")
            .field("key", &self.key)
            .field("channel_id", &self.channel_id)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

type Slot = Arc<OnceCell<Arc<CachedClient>>>;

/// Process-wide client cache.
pub struct ClientRegistry {
    connector: Arc<dyn Connector>,
    network: RwLock<Option<Arc<ComposedConfig>>>,
    clients: DashMap<ClientKey, Slot>,
}

impl ClientRegistry {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            network: RwLock::new(None),
            clients: DashMap::new(),
        }
    }

    /// Sets the network configuration. May be called once.
    pub fn initialize_network(&self, config: ComposedConfig) -> Result<()> {
        let mut network = self.network.write();
        if network.is_some() {
            return Err(corelib::Error::AlreadyInitialized.into());
        }
        info!(
            organizations = config.resolved().organizations.len(),
            peers = config.resolved().peers.len(),
            has_override = config.has_override(),
            "network configuration initialized"
        );
        *network = Some(Arc::new(config));
        Ok(())
    }

    /// Composes `settings` and initializes the network with the result.
    pub fn initialize_from_settings(&self, settings: &NetworkSettings) -> Result<()> {
        self.initialize_network(settings.compose()?)
    }

    pub fn network(&self) -> Result<Arc<ComposedConfig>> {
        self.network
            .read()
            .clone()
            .ok_or_else(|| corelib::Error::Uninitialized.into())
    }

    /// Returns the client for `spec`, creating it on first use.
    pub async fn get_or_create(&self, spec: &ConnectorSpec) -> Result<Arc<CachedClient>> {
        if spec.identity.is_anonymous() {
            return Err(ClientError::Identity("user name is not specified".to_string()));
        }
        let network = self.network()?;
        let key = spec.key();

        let slot = Slot::clone(self.clients.entry(key.clone()).or_default().value());
        if let Some(client) = slot.get() {
            debug!(client = %key, "reusing cached client");
            return Ok(Arc::clone(client));
        }

        match slot.get_or_try_init(|| self.build(key.clone(), spec, &network)).await {
            Ok(client) => Ok(Arc::clone(client)),
            Err(err) => {
                self.clients
                    .remove_if(&key, |_, current| Arc::ptr_eq(current, &slot) && !current.initialized());
                debug!(client = %key, error = %err, "discarded failed client slot");
                Err(err)
            }
        }
    }

    /// Cached client for `key`, if one has been built.
    pub fn get(&self, key: &ClientKey) -> Option<Arc<CachedClient>> {
        self.clients.get(key).and_then(|slot| slot.get().cloned())
    }

    /// Number of built clients.
    pub fn len(&self) -> usize {
        self.clients.iter().filter(|slot| slot.value().initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn build(&self, key: ClientKey, spec: &ConnectorSpec, network: &ComposedConfig) -> Result<Arc<CachedClient>> {
        info!(client = %key, channel = %spec.channel_id, "creating ledger client");

        let session = self
            .connector
            .session(network.shared(), &spec.identity)
            .await
            .map_err(|source| ClientError::Connection {
                context: format!("failed to create session for {}", spec.identity),
                source,
            })?;
        let channel = session
            .channel(&spec.channel_id)
            .await
            .map_err(|source| ClientError::Connection {
                context: format!("failed to create client of channel {}", spec.channel_id),
                source,
            })?;

        let filter = if spec.user_org_only {
            org_filter(network.resolved(), spec.identity.org()).map(|f| Arc::new(f) as Arc<dyn TargetFilter>)
        } else {
            None
        };

        Ok(Arc::new(CachedClient {
            key,
            identity: spec.identity.clone(),
            channel_id: spec.channel_id.clone(),
            session,
            channel,
            filter,
        }))
    }
}

impl fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("initialized", &self.network.read().is_some())
            .field("clients", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use corelib::NetworkConfig;

    struct Refusing;

    #[async_trait]
    impl Connector for Refusing {
        async fn session(
            &self,
            _config: Arc<NetworkConfig>,
            identity: &Identity,
        ) -> std::result::Result<Arc<dyn Session>, TransportError> {
            Err(TransportError::Identity(identity.to_string()))
        }
    }

    fn config() -> ComposedConfig {
        ComposedConfig::compose(b"client:\n  organization: org1\n", b"").unwrap()
    }

    #[test]
    fn test_initialize_once() {
        let registry = ClientRegistry::new(Arc::new(Refusing));
        assert!(matches!(
            registry.network(),
            Err(ClientError::Configuration(corelib::Error::Uninitialized))
        ));
        registry.initialize_network(config()).unwrap();
        assert!(registry.network().is_ok());
        assert!(matches!(
            registry.initialize_network(config()),
            Err(ClientError::Configuration(corelib::Error::AlreadyInitialized))
        ));
    }

    #[tokio::test]
    async fn test_failed_build_leaves_no_slot() {
        // A refused session must not leave an entry behind
        let registry = ClientRegistry::new(Arc::new(Refusing));
        registry.initialize_network(config()).unwrap();
        let spec = ConnectorSpec::new("net", Identity::parse("User1"), "mychannel");

        let err = registry.get_or_create(&spec).await.unwrap_err();
        assert!(matches!(err, ClientError::Connection { .. }));
        assert!(registry.is_empty());
        assert!(registry.get(&spec.key()).is_none());
        assert_eq!(registry.clients.len(), 0);
    }

    #[tokio::test]
    async fn test_failing_identities_do_not_grow_the_map() {
        // Many distinct identities that all fail leave the map empty
        let registry = ClientRegistry::new(Arc::new(Refusing));
        registry.initialize_network(config()).unwrap();

        for n in 0..200 {
            let spec = ConnectorSpec::new("net", Identity::parse(&format!("User{}", n)), "mychannel");
            assert!(registry.get_or_create(&spec).await.is_err());
        }
        assert_eq!(registry.clients.len(), 0);

        // retrying a failed key starts from a fresh slot
        let spec = ConnectorSpec::new("net", Identity::parse("User1"), "mychannel");
        assert!(registry.get_or_create(&spec).await.is_err());
        assert_eq!(registry.clients.len(), 0);
    }
}
