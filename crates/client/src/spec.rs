//! Per-request connector description and the cache key derived from it.

use corelib::Identity;
use std::fmt;
use std::time::Duration;

/// What one request needs from the registry and the dispatcher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectorSpec {
    pub connection_name: String,
    pub identity: Identity,
    pub channel_id: String,
    pub timeout_millis: u64,
    pub endpoints: Vec<String>,
    pub user_org_only: bool,
}

impl ConnectorSpec {
    pub fn new(connection_name: impl Into<String>, identity: Identity, channel_id: impl Into<String>) -> Self {
        Self {
            connection_name: connection_name.into(),
            identity,
            channel_id: channel_id.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout_millis(mut self, timeout_millis: u64) -> Self {
        self.timeout_millis = timeout_millis;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_user_org_only(mut self, user_org_only: bool) -> Self {
        self.user_org_only = user_org_only;
        self
    }

    /// Cache key of the client serving this spec. Channel, timeout and
    /// endpoints are not part of it.
    pub fn key(&self) -> ClientKey {
        ClientKey {
            connection_name: self.connection_name.clone(),
            user: self.identity.user.clone(),
            org: self.identity.org.clone().unwrap_or_default(),
            user_org_only: self.user_org_only,
        }
    }

    /// The per-call part of the spec.
    pub fn call_options(&self) -> CallOptions {
        CallOptions {
            timeout_millis: self.timeout_millis,
            endpoints: self.endpoints.clone(),
        }
    }
}

/// Identifies one cached client.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientKey {
    pub connection_name: String,
    pub user: String,
    pub org: String,
    pub user_org_only: bool,
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.connection_name, self.user, self.org, self.user_org_only
        )
    }
}

/// Options that vary per call and are never stored on a cached client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub timeout_millis: u64,
    pub endpoints: Vec<String>,
}

impl CallOptions {
    /// `None` when no positive timeout was requested.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_millis > 0).then(|| Duration::from_millis(self.timeout_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_per_call_fields() {
        let base = ConnectorSpec::new("net", Identity::parse("User1@org1"), "mychannel");
        let other = base
            .clone()
            .with_timeout_millis(1500)
            .with_endpoints(vec!["peer0:7051".into()]);
        assert_eq!(base.key(), other.key());
        assert_eq!(base.key().to_string(), "net.User1.org1.false");
    }

    #[test]
    fn test_key_distinguishes_org_only() {
        let spec = ConnectorSpec::new("net", Identity::parse("User1"), "mychannel");
        assert_ne!(spec.key(), spec.clone().with_user_org_only(true).key());
    }

    #[test]
    fn test_timeout_only_when_positive() {
        let spec = ConnectorSpec::new("net", Identity::parse("User1"), "mychannel");
        assert_eq!(spec.call_options().timeout(), None);
        assert_eq!(
            spec.with_timeout_millis(250).call_options().timeout(),
            Some(Duration::from_millis(250))
        );
    }
}
