//! Network configuration documents.
//!
//! A network configuration describes the ledger topology a client reaches:
//! organizations and their MSP identifiers, peers, orderers, channels and the
//! client's own credential locations. An optional entity-matcher document of
//! the same shape can be layered on top of it.

pub mod compose;
pub mod merge;
pub mod network;

pub use compose::{ComposedConfig, ConfigLayer, LayerOrigin};
pub use merge::Merge;
pub use network::{
    ChannelConfig, ChannelPeerConfig, ClientConfig, CryptoConfig, EndpointConfig, EntityMatcherConfig,
    EntityMatchers, NetworkConfig, OrganizationConfig, TlsCertConfig,
};
