//! Error types for the collaborator clients.

use thiserror::Error;

/// Errors from constructing or acquiring a client handle.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The client could not be built (bad configuration, TLS setup, ...).
    #[error("failed to construct {client} client: {reason}")]
    Construction { client: &'static str, reason: String },

    /// The slot was already released during shutdown.
    #[error("{0} client already released")]
    Released(&'static str),
}

/// Errors from the classifier.
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    /// Transport failure, timeout, or non-success status.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    /// The classifier answered with something we could not read.
    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),

    /// The classifier handle could not be acquired.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Errors from the signing authority.
///
/// [`AuthorityError::InvalidSignature`] is an expected outcome of verify,
/// not a fault. Every other variant means the authority could not answer.
#[derive(Debug, Clone, Error)]
pub enum AuthorityError {
    /// The authority affirmatively reports that the signature does not match.
    #[error("signature is invalid")]
    InvalidSignature,

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Transport failure, timeout, throttling, or an unknown error type.
    #[error("signing authority unavailable: {0}")]
    Unavailable(String),

    #[error("malformed authority response: {0}")]
    MalformedResponse(String),

    /// The authority handle could not be acquired.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl AuthorityError {
    /// True only for the expected "signature does not match" outcome.
    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, AuthorityError::InvalidSignature)
    }
}

/// Result type for client lifecycle operations.
pub type Result<T> = std::result::Result<T, ClientError>;
