//! Participant identities.
//!
//! Requests name their signer as `user` or `user@org`. When the organization
//! is omitted, the network configuration's default client organization
//! applies.

use std::fmt;

/// A user, optionally qualified by organization.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Identity {
    pub user: String,
    pub org: Option<String>,
}

impl Identity {
    pub fn new(user: impl Into<String>, org: Option<String>) -> Self {
        Self {
            user: user.into(),
            org: org.filter(|o| !o.is_empty()),
        }
    }

    /// Parses `user` or `user@org`. Surrounding whitespace is trimmed and an
    /// empty organization is treated as absent.
    pub fn parse(text: &str) -> Self {
        let mut tokens = text.trim().split('@');
        let user = tokens.next().unwrap_or_default().trim().to_string();
        let org = tokens.next().map(|o| o.trim().to_string());
        Self::new(user, org)
    }

    /// True when no user name is present.
    pub fn is_anonymous(&self) -> bool {
        self.user.is_empty()
    }

    /// Organization name, if one was given.
    pub fn org(&self) -> Option<&str> {
        self.org.as_deref()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.org {
            Some(org) => write!(f, "{}@{}", self.user, org),
            None => f.write_str(&self.user),
        }
    }
}
