//! Target filter abstractions.
//!
//! A target filter restricts which peers a request may be sent to. The
//! transport asks the filter about every candidate peer and only dispatches
//! to the accepted ones.

pub mod org;

pub use org::OrgFilter;

use crate::peer::Peer;
use std::fmt::Debug;

/// Predicate over peer identity.
///
/// # Thread Safety
///
/// Filters are attached to cached clients and shared by concurrent requests,
/// so implementations must be `Send + Sync`.
pub trait TargetFilter: Debug + Send + Sync + 'static {
    /// Whether requests may target `peer`.
    fn accept(&self, peer: &dyn Peer) -> bool;

    /// Filter name (for logging/debugging).
    fn name(&self) -> &'static str;
}
