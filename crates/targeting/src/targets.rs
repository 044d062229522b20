//! Request-time target selection.
//!
//! # Precedence
//!
//! 1. A non-empty explicit endpoint list always wins.
//! 2. Otherwise the client's organization filter, if one is attached.
//! 3. Otherwise no restriction; the transport's default selection applies.

use crate::directory::PeerDirectory;
use crate::filter::TargetFilter;
use crate::peer::PeerInfo;
use std::sync::Arc;

/// Targeting restriction handed to the transport with each request.
#[derive(Debug, Clone, Default)]
pub enum Targets {
    /// Default peer selection.
    #[default]
    Any,
    /// Only these endpoints (peer names or URLs).
    Endpoints(Vec<String>),
    /// Only peers accepted by this filter.
    Filter(Arc<dyn TargetFilter>),
}

impl Targets {
    /// Applies the precedence rules to one request.
    pub fn compose(endpoints: &[String], filter: Option<&Arc<dyn TargetFilter>>) -> Self {
        if !endpoints.is_empty() {
            Targets::Endpoints(endpoints.to_vec())
        } else if let Some(filter) = filter {
            Targets::Filter(Arc::clone(filter))
        } else {
            Targets::Any
        }
    }

    pub fn is_restricted(&self) -> bool {
        !matches!(self, Targets::Any)
    }

    pub fn endpoints(&self) -> Option<&[String]> {
        match self {
            Targets::Endpoints(endpoints) => Some(endpoints),
            _ => None,
        }
    }

    pub fn filter(&self) -> Option<&dyn TargetFilter> {
        match self {
            Targets::Filter(filter) => Some(&**filter),
            _ => None,
        }
    }

    /// Peers of `directory` this restriction allows, in directory order.
    /// Endpoints that name no known peer are skipped.
    pub fn select<'a>(&self, directory: &'a PeerDirectory) -> Vec<&'a PeerInfo> {
        match self {
            Targets::Any => directory.peers().iter().collect(),
            Targets::Endpoints(endpoints) => directory
                .peers()
                .iter()
                .filter(|p| endpoints.iter().any(|e| p.answers_to(e)))
                .collect(),
            Targets::Filter(filter) => directory.peers().iter().filter(|p| filter.accept(*p)).collect(),
        }
    }
}
