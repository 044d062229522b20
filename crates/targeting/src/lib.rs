//! Peer targeting for ledger requests.
//!
//! This crate decides which peers a request may reach:
//! - Which peers exist and which organization (MSP) each belongs to
//! - Organization filters derived from the network configuration
//! - Entity matchers mapping logical peer addresses to physical endpoints
//! - Request-time precedence between explicit endpoints and filters

pub mod directory;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod peer;
pub mod resolve;
pub mod targets;

pub use directory::PeerDirectory;
pub use error::TargetingError;
pub use filter::{OrgFilter, TargetFilter};
pub use matcher::{EntityMatcher, MatchedEndpoint};
pub use peer::{Peer, PeerInfo};
pub use resolve::{org_filter, resolve_org, OrgLookup};
pub use targets::Targets;
