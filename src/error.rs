use thiserror::Error;

/// Configuration problems caught before any network activity. Fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("{sources} sources but {targets} targets; the lists must pair up one to one")]
    PairMismatch { sources: usize, targets: usize },
}

/// An identifier that matches no conversation the account can see.
/// Aborts the whole run; a partially resolved mapping set never starts.
#[derive(Debug, Error)]
#[error("no conversation matches {identifier:?}")]
pub struct ResolutionError {
    pub identifier: String,
}

impl ResolutionError {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// A single failed delivery attempt. Logged and skipped by the caller,
/// never fatal to the pipeline.
#[derive(Debug, Error)]
#[error("relay of message {message_id} failed")]
pub struct RelayError {
    pub message_id: i32,
    #[source]
    pub cause: Box<dyn std::error::Error + Send + Sync>,
}

impl RelayError {
    pub fn new(message_id: i32, cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            message_id,
            cause: cause.into(),
        }
    }
}
