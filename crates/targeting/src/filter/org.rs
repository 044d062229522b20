//! Organization filter.
//!
//! Accepts exactly the peers whose MSP identifier equals the organization's.

use crate::filter::TargetFilter;
use crate::peer::Peer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgFilter {
    msp_id: String,
}

impl OrgFilter {
    pub fn new(msp_id: impl Into<String>) -> Self {
        Self { msp_id: msp_id.into() }
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }
}

impl TargetFilter for OrgFilter {
    fn accept(&self, peer: &dyn Peer) -> bool {
        peer.msp_id() == self.msp_id
    }

    fn name(&self) -> &'static str {
        "OrgFilter"
    }
}
