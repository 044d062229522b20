//! In-memory ledger used by the client integration tests.
//!
//! Implements the transport traits over a single `basic` asset chaincode and
//! records the options of every call, so tests can observe both results and
//! how requests were targeted.

#![allow(dead_code)]

use async_trait::async_trait;
use client::{
    ChaincodeResponse, ChannelClient, ClientRegistry, Connector, RequestOptions, Session, TransactionRequest,
    TransportError,
};
use corelib::{ComposedConfig, Identity, NetworkConfig};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use targeting::PeerDirectory;

pub const CHANNEL: &str = "mychannel";
pub const CHAINCODE: &str = "basic";

pub const NETWORK: &str = r#"
name: test-network
version: 1.0.0
client:
  organization: org1
  cryptoconfig:
    path: /tmp/crypto
channels:
  mychannel:
    peers:
      peer0.org1.example.com: {}
      peer0.org2.example.com: {}
organizations:
  org1:
    mspid: Org1MSP
    cryptoPath: peerOrganizations/org1.example.com/users/{username}@org1.example.com/msp
    peers: [peer0.org1.example.com]
  org2:
    mspid: Org2MSP
    cryptoPath: peerOrganizations/org2.example.com/users/{username}@org2.example.com/msp
    peers: [peer0.org2.example.com]
peers:
  peer0.org1.example.com:
    url: peer0.org1.example.com:7051
  peer0.org2.example.com:
    url: peer0.org2.example.com:9051
"#;

pub const MATCHERS: &str = r#"
entityMatchers:
  peer:
    - pattern: peer0.org1.example.com:(\d+)
      urlSubstitutionExp: localhost:$1
    - pattern: peer0.org2.example.com:(\d+)
      urlSubstitutionExp: localhost:$1
"#;

/// Routes `tracing` output to the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn composed() -> ComposedConfig {
    ComposedConfig::compose(NETWORK.as_bytes(), MATCHERS.as_bytes()).unwrap()
}

/// A registry over a fresh ledger, with the test network initialized.
pub fn registry() -> (Arc<ClientRegistry>, Arc<MemoryConnector>) {
    init_tracing();
    let connector = Arc::new(MemoryConnector::default());
    let registry = Arc::new(ClientRegistry::new(connector.clone()));
    registry.initialize_network(composed()).unwrap();
    (registry, connector)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "ID")]
    pub id: String,
    pub color: String,
    pub size: u32,
    pub owner: String,
    #[serde(rename = "appraisedValue")]
    pub appraised_value: u32,
}

impl Asset {
    fn new(id: &str, color: &str, size: u32, owner: &str, appraised_value: u32) -> Self {
        Self {
            id: id.to_string(),
            color: color.to_string(),
            size,
            owner: owner.to_string(),
            appraised_value,
        }
    }
}

/// World state of the `basic` chaincode.
#[derive(Debug, Default)]
pub struct Ledger {
    assets: Mutex<BTreeMap<String, Asset>>,
}

impl Ledger {
    fn init(&self) {
        let seed = [
            Asset::new("asset1", "blue", 5, "Tomoko", 300),
            Asset::new("asset2", "red", 5, "Brad", 400),
            Asset::new("asset3", "green", 10, "Jin Soo", 500),
            Asset::new("asset4", "yellow", 10, "Max", 600),
            Asset::new("asset5", "black", 15, "Adriana", 700),
            Asset::new("asset6", "white", 15, "Michel", 800),
        ];
        let mut assets = self.assets.lock();
        for asset in seed {
            assets.insert(asset.id.clone(), asset);
        }
    }

    fn read(&self, id: &str) -> Result<Vec<u8>, TransportError> {
        let assets = self.assets.lock();
        let asset = assets.get(id).ok_or_else(|| TransportError::Chaincode {
            status: 500,
            message: format!("the asset {} does not exist", id),
        })?;
        serde_json::to_vec(asset).map_err(|e| TransportError::Other(e.to_string()))
    }

    fn transfer(&self, id: &str, owner: &str) -> Result<Vec<u8>, TransportError> {
        let mut assets = self.assets.lock();
        let asset = assets.get_mut(id).ok_or_else(|| TransportError::Chaincode {
            status: 500,
            message: format!("the asset {} does not exist", id),
        })?;
        let previous = std::mem::replace(&mut asset.owner, owner.to_string());
        Ok(previous.into_bytes())
    }

    fn call(&self, request: &TransactionRequest, write: bool) -> Result<ChaincodeResponse, TransportError> {
        if request.chaincode_id != CHAINCODE {
            return Err(TransportError::Chaincode {
                status: 404,
                message: format!("chaincode {} is not installed", request.chaincode_id),
            });
        }
        let arg = |i: usize| {
            request
                .args
                .get(i)
                .map(|a| String::from_utf8_lossy(a).into_owned())
                .unwrap_or_default()
        };
        let payload = match (request.function.as_str(), write) {
            ("InitLedger", true) => {
                self.init();
                Vec::new()
            }
            ("ReadAsset", _) => self.read(&arg(0))?,
            ("TransferAsset", true) => self.transfer(&arg(0), &arg(1))?,
            ("Echo", _) => arg(0).into_bytes(),
            (function, _) => {
                return Err(TransportError::Chaincode {
                    status: 500,
                    message: format!("function {} is not supported here", function),
                })
            }
        };
        Ok(ChaincodeResponse {
            payload,
            status: 200,
            tx_id: None,
        })
    }
}

/// A call as seen by the ledger.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub function: String,
    pub write: bool,
    pub options: RequestOptions,
    pub peers: Vec<String>,
}

/// Connector over the in-memory ledger.
#[derive(Debug, Default)]
pub struct MemoryConnector {
    pub ledger: Arc<Ledger>,
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    sessions: AtomicUsize,
}

impl MemoryConnector {
    /// Number of sessions opened so far.
    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn session(
        &self,
        config: Arc<NetworkConfig>,
        identity: &Identity,
    ) -> Result<Arc<dyn Session>, TransportError> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        // Widen the window in which concurrent callers could race.
        tokio::time::sleep(Duration::from_millis(20)).await;

        if identity.user == "Unknown" {
            return Err(TransportError::Identity(identity.to_string()));
        }
        let directory = PeerDirectory::from_config(&config).map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Arc::new(MemorySession {
            config,
            directory: Arc::new(directory),
            ledger: self.ledger.clone(),
            calls: self.calls.clone(),
        }))
    }
}

struct MemorySession {
    config: Arc<NetworkConfig>,
    directory: Arc<PeerDirectory>,
    ledger: Arc<Ledger>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

#[async_trait]
impl Session for MemorySession {
    async fn channel(&self, channel_id: &str) -> Result<Arc<dyn ChannelClient>, TransportError> {
        if !self.config.channels.contains_key(channel_id) {
            return Err(TransportError::Unavailable(format!("channel {} is not configured", channel_id)));
        }
        Ok(Arc::new(MemoryChannel {
            directory: self.directory.clone(),
            ledger: self.ledger.clone(),
            calls: self.calls.clone(),
        }))
    }
}

struct MemoryChannel {
    directory: Arc<PeerDirectory>,
    ledger: Arc<Ledger>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MemoryChannel {
    fn call(
        &self,
        request: &TransactionRequest,
        options: &RequestOptions,
        write: bool,
    ) -> Result<ChaincodeResponse, TransportError> {
        let peers: Vec<String> = options
            .targets
            .select(&self.directory)
            .into_iter()
            .map(|p| p.name.clone())
            .collect();
        self.calls.lock().push(RecordedCall {
            function: request.function.clone(),
            write,
            options: options.clone(),
            peers: peers.clone(),
        });
        if peers.is_empty() {
            return Err(TransportError::Unavailable(format!("no peer matches {:?}", options.targets)));
        }
        self.ledger.call(request, write)
    }
}

#[async_trait]
impl ChannelClient for MemoryChannel {
    async fn execute(
        &self,
        request: &TransactionRequest,
        options: &RequestOptions,
    ) -> Result<ChaincodeResponse, TransportError> {
        self.call(request, options, true)
    }

    async fn query(
        &self,
        request: &TransactionRequest,
        options: &RequestOptions,
    ) -> Result<ChaincodeResponse, TransportError> {
        self.call(request, options, false)
    }
}
