//! Organization resolution.
//!
//! Picks the organization a client acts for (the requested one, else the
//! configuration's default client organization) and finds its MSP identifier.
//! Failure to resolve is not an error for callers: the request simply goes out
//! without an organization filter. The outcome is still reported precisely so
//! it can be logged and tested.

use crate::filter::OrgFilter;
use corelib::NetworkConfig;
use std::fmt;
use tracing::debug;

/// Outcome of resolving an organization against the configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrgLookup {
    /// The organization exists and declares an MSP identifier.
    Found { org: String, msp_id: String },
    /// No organization with this name is configured.
    NotFound { org: String },
    /// The organization exists but has no MSP identifier.
    NoMspId { org: String },
    /// Nothing was requested and the configuration names no default.
    NoOrganization,
}

impl OrgLookup {
    pub fn msp_id(&self) -> Option<&str> {
        match self {
            OrgLookup::Found { msp_id, .. } => Some(msp_id),
            _ => None,
        }
    }
}

impl fmt::Display for OrgLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrgLookup::Found { org, msp_id } => write!(f, "organization {} has MSP {}", org, msp_id),
            OrgLookup::NotFound { org } => write!(f, "organization {} is not configured", org),
            OrgLookup::NoMspId { org } => write!(f, "organization {} has no MSP id", org),
            OrgLookup::NoOrganization => f.write_str("no organization requested and no default configured"),
        }
    }
}

/// Resolves `requested` (or the default client organization when it is
/// absent or empty) to its MSP identifier.
pub fn resolve_org(config: &NetworkConfig, requested: Option<&str>) -> OrgLookup {
    let name = match requested.filter(|o| !o.is_empty()).or_else(|| config.default_organization()) {
        Some(name) => name,
        None => return OrgLookup::NoOrganization,
    };
    if config.organization(name).is_none() {
        return OrgLookup::NotFound { org: name.to_string() };
    }
    match config.msp_id(name) {
        Some(msp_id) => OrgLookup::Found {
            org: name.to_string(),
            msp_id: msp_id.to_string(),
        },
        None => OrgLookup::NoMspId { org: name.to_string() },
    }
}

/// Organization filter for `requested`, or `None` when the organization
/// cannot be resolved.
pub fn org_filter(config: &NetworkConfig, requested: Option<&str>) -> Option<OrgFilter> {
    let lookup = resolve_org(config, requested);
    match lookup.msp_id() {
        Some(msp_id) => {
            debug!(%lookup, "attaching organization filter");
            Some(OrgFilter::new(msp_id))
        }
        None => {
            debug!(%lookup, "no organization filter attached, using default peer selection");
            None
        }
    }
}
