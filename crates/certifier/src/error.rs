//! Error types for the orchestrators.

use certifier_clients::{AuthorityError, ClassifierError, ClientError};
use certifier_core::CodecError;
use thiserror::Error;

/// Errors returned by [`crate::Certifier`] operations.
///
/// An invalid signature is not an error: it is `VerificationOutcome::INVALID`.
#[derive(Debug, Error)]
pub enum CertifyError {
    /// Caller sent text that does not decode. No external call was made.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] CodecError),

    /// A collaborator could not answer.
    #[error("service fault: {0}")]
    ServiceFault(#[source] ServiceFault),
}

/// What went wrong behind a [`CertifyError::ServiceFault`].
///
/// Logged, never shown to callers.
#[derive(Debug, Error)]
pub enum ServiceFault {
    #[error("classifier: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("signing authority: {0}")]
    Authority(#[from] AuthorityError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl CertifyError {
    /// True when the caller is at fault.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, CertifyError::MalformedInput(_))
    }
}

impl From<ClassifierError> for CertifyError {
    fn from(e: ClassifierError) -> Self {
        CertifyError::ServiceFault(e.into())
    }
}

impl From<AuthorityError> for CertifyError {
    fn from(e: AuthorityError) -> Self {
        CertifyError::ServiceFault(e.into())
    }
}

impl From<ClientError> for CertifyError {
    fn from(e: ClientError) -> Self {
        CertifyError::ServiceFault(e.into())
    }
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, CertifyError>;
