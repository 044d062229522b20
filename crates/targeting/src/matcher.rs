//! Entity matchers.
//!
//! An entity matcher maps a logical peer address (as it appears in the
//! network configuration) to the endpoint the client should actually dial.
//! Rules are tried in order; the first whose pattern matches wins.
//!
//! A substitution expression containing `$` is expanded against the pattern's
//! capture groups (`$1`, `${name}`); one without `$` is used verbatim.

use crate::error::TargetingError;
use corelib::config::EntityMatcherConfig;
use regex::Regex;

/// Compiled entity-matcher rule.
#[derive(Debug, Clone)]
pub struct EntityMatcher {
    pattern: Regex,
    url_substitution: Option<String>,
    ssl_target_override: Option<String>,
    mapped_host: Option<String>,
    ignore_endpoint: bool,
}

/// What a matching rule says about an address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchedEndpoint {
    pub url: Option<String>,
    pub ssl_target_override: Option<String>,
    pub mapped_host: Option<String>,
    pub ignored: bool,
}

impl EntityMatcher {
    pub fn compile(config: &EntityMatcherConfig) -> Result<Self, TargetingError> {
        let pattern = Regex::new(&config.pattern).map_err(|source| TargetingError::InvalidPattern {
            pattern: config.pattern.clone(),
            source,
        })?;
        Ok(Self {
            pattern,
            url_substitution: config.url_substitution_exp.clone().filter(|s| !s.is_empty()),
            ssl_target_override: config
                .ssl_target_override_url_substitution_exp
                .clone()
                .filter(|s| !s.is_empty()),
            mapped_host: config.mapped_host.clone().filter(|s| !s.is_empty()),
            ignore_endpoint: config.ignore_endpoint.unwrap_or(false),
        })
    }

    /// Compiles a list of rules, preserving order.
    pub fn compile_all(configs: &[EntityMatcherConfig]) -> Result<Vec<Self>, TargetingError> {
        configs.iter().map(Self::compile).collect()
    }

    /// Applies this rule to `address`, or returns `None` if it does not match.
    pub fn apply(&self, address: &str) -> Option<MatchedEndpoint> {
        if !self.pattern.is_match(address) {
            return None;
        }
        Some(MatchedEndpoint {
            url: self.url_substitution.as_deref().map(|exp| self.expand(address, exp)),
            ssl_target_override: self
                .ssl_target_override
                .as_deref()
                .map(|exp| self.expand(address, exp)),
            mapped_host: self.mapped_host.clone(),
            ignored: self.ignore_endpoint,
        })
    }

    fn expand(&self, address: &str, exp: &str) -> String {
        if exp.contains('$') {
            self.pattern.replace_all(address, exp).into_owned()
        } else {
            exp.to_string()
        }
    }
}

/// First matching rule's outcome for `address`.
pub fn first_match(matchers: &[EntityMatcher], address: &str) -> Option<MatchedEndpoint> {
    matchers.iter().find_map(|m| m.apply(address))
}
