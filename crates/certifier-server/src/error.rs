//! Transport error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use certifier::CertifyError;
use serde_json::json;
use thiserror::Error;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Certify(#[from] CertifyError),

    /// The request outlived its deadline. The outstanding call keeps running
    /// in the background and its result is dropped.
    #[error("request timed out")]
    Timeout,

    /// The spawned request task panicked.
    #[error("request task failed: {0}")]
    Task(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Certify(e) if e.is_client_fault() => StatusCode::BAD_REQUEST,
            ApiError::Certify(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal details are logged, never returned.
        let status = self.status_code();
        let message = match &self {
            ApiError::Certify(e) if e.is_client_fault() => {
                tracing::warn!(error = %e, "rejected malformed input");
                "malformed input"
            }
            ApiError::Timeout => {
                tracing::warn!("request timed out");
                "request timed out"
            }
            other => {
                tracing::error!(error = %other, "service fault");
                "internal server error"
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certifier::ServiceFault;
    use certifier_clients::AuthorityError;
    use certifier_core::decode_signature;

    #[test]
    fn test_status_codes() {
        let malformed = ApiError::from(CertifyError::from(decode_signature("!").unwrap_err()));
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

        let fault = ApiError::from(CertifyError::ServiceFault(ServiceFault::Authority(
            AuthorityError::AccessDenied("arn:secret".into()),
        )));
        assert_eq!(fault.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(ApiError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }
}
