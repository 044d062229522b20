use thiserror::Error;

/// Errors raised while building targeting structures from configuration.
#[derive(Debug, Error)]
pub enum TargetingError {
    #[error("invalid entity matcher pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
