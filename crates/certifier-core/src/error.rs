//! Error types for Certifier Core.

use thiserror::Error;

/// Errors raised while decoding wire text into binary form.
///
/// Always a client fault: the text came from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("malformed {field}: {reason}")]
    MalformedInput {
        /// Which input failed (`signature`, `digest`).
        field: &'static str,
        reason: String,
    },
}

impl CodecError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        CodecError::MalformedInput {
            field,
            reason: reason.into(),
        }
    }

    /// The input field that failed to decode.
    pub fn field(&self) -> &'static str {
        match self {
            CodecError::MalformedInput { field, .. } => field,
        }
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
