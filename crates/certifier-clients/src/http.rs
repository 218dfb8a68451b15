//! JSON-over-HTTP collaborator clients.
//!
//! Classifier: `POST {base}/endpoints/{endpoint}/invocations` with the raw
//! content as the body, answering `{"label": "..."}`.
//!
//! Signing authority: KMS-style JSON operations `POST {base}/sign`,
//! `{base}/verify`, `{base}/public-key`. Failures carry an `__type` field
//! naming the error; `KMSInvalidSignatureException` is the expected
//! verify-mismatch outcome.
//!
//! Every request carries the configured region in [`REGION_HEADER`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use certifier_core::{
    decode_signature, encode_signature, ClassificationDecision, ContentDigest, PublicKey,
    SigningAlgorithm,
};

use crate::error::{AuthorityError, ClassifierError, ClientError};
use crate::traits::{Classifier, ManagedClient, SigningAuthority};

/// Header carrying the deployment region on every collaborator request.
pub const REGION_HEADER: &str = "x-certifier-region";

const INVALID_SIGNATURE_TYPE: &str = "KMSInvalidSignatureException";
const ACCESS_DENIED_TYPE: &str = "AccessDeniedException";
const NOT_FOUND_TYPE: &str = "NotFoundException";

/// Connection settings shared by both HTTP clients.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the service.
    pub base_url: Url,
    /// Deployment region, forwarded in [`REGION_HEADER`].
    pub region: String,
    /// Per-call timeout.
    pub timeout: Duration,
}

impl HttpClientConfig {
    fn build_client(&self, client: &'static str) -> Result<reqwest::Client, ClientError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::Construction {
                client,
                reason: e.to_string(),
            })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classifier
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LabelResponse {
    label: String,
}

/// Classifier reached over HTTP.
pub struct HttpClassifier {
    http: reqwest::Client,
    invocation_url: String,
    region: String,
}

impl HttpClassifier {
    pub fn new(config: &HttpClientConfig, endpoint: &str) -> Result<Self, ClientError> {
        if endpoint.trim().is_empty() {
            return Err(ClientError::Construction {
                client: "classifier",
                reason: "endpoint name is empty".into(),
            });
        }
        Ok(Self {
            http: config.build_client("classifier")?,
            invocation_url: config.endpoint(&format!("endpoints/{}/invocations", endpoint)),
            region: config.region.clone(),
        })
    }
}

#[async_trait]
impl ManagedClient for HttpClassifier {
    async fn close(&self) {
        tracing::info!(url = %self.invocation_url, "closing classifier client");
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, content: &[u8]) -> Result<ClassificationDecision, ClassifierError> {
        let response = self
            .http
            .post(&self.invocation_url)
            .header(REGION_HEADER, &self.region)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(content.to_vec())
            .send()
            .await
            .map_err(|e| ClassifierError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Unavailable(format!("status {}", status)));
        }

        let body: LabelResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

        tracing::debug!(label = %body.label, "classifier responded");
        Ok(ClassificationDecision::from_label(&body.label))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Signing authority
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest<'a> {
    key_id: &'a str,
    message: String,
    message_type: &'static str,
    signing_algorithm: SigningAlgorithm,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    signature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    key_id: &'a str,
    message: String,
    message_type: &'static str,
    signature: String,
    signing_algorithm: SigningAlgorithm,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    signature_valid: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyRequest<'a> {
    key_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyResponse {
    public_key: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Map a failed authority response to an [`AuthorityError`].
///
/// `__type` may be namespaced (`com.amazonaws.kms#NotFoundException`); only
/// the last segment is matched.
pub(crate) fn authority_error(status: StatusCode, body: &[u8]) -> AuthorityError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let kind = parsed.kind.unwrap_or_default();
    let name = kind.rsplit('#').next().unwrap_or_default();
    let detail = parsed.message.unwrap_or_else(|| format!("status {}", status));

    match name {
        INVALID_SIGNATURE_TYPE => AuthorityError::InvalidSignature,
        ACCESS_DENIED_TYPE => AuthorityError::AccessDenied(detail),
        NOT_FOUND_TYPE => AuthorityError::KeyNotFound(detail),
        "" => AuthorityError::Unavailable(detail),
        other => AuthorityError::Unavailable(format!("{}: {}", other, detail)),
    }
}

/// Signing authority reached over HTTP.
pub struct HttpSigningAuthority {
    http: reqwest::Client,
    config: HttpClientConfig,
}

impl HttpSigningAuthority {
    pub fn new(config: &HttpClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: config.build_client("signing-authority")?,
            config: config.clone(),
        })
    }

    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp, AuthorityError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.config.endpoint(operation))
            .header(REGION_HEADER, &self.config.region)
            .json(request)
            .send()
            .await
            .map_err(|e| AuthorityError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Resp>()
                .await
                .map_err(|e| AuthorityError::MalformedResponse(e.to_string()));
        }

        let body = response.bytes().await.unwrap_or_default();
        let err = authority_error(status, &body);
        tracing::debug!(operation, %status, error = %err, "authority call failed");
        Err(err)
    }
}

#[async_trait]
impl ManagedClient for HttpSigningAuthority {
    async fn close(&self) {
        tracing::info!(url = %self.config.base_url, "closing signing authority client");
    }
}

#[async_trait]
impl SigningAuthority for HttpSigningAuthority {
    async fn sign(
        &self,
        key_id: &str,
        digest: &ContentDigest,
        algorithm: SigningAlgorithm,
    ) -> Result<Vec<u8>, AuthorityError> {
        let request = SignRequest {
            key_id,
            message: encode_signature(digest.as_bytes()),
            message_type: "DIGEST",
            signing_algorithm: algorithm,
        };
        let response: SignResponse = self.call("sign", &request).await?;
        decode_signature(&response.signature)
            .map_err(|e| AuthorityError::MalformedResponse(e.to_string()))
    }

    async fn verify(
        &self,
        key_id: &str,
        digest: &ContentDigest,
        signature: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<bool, AuthorityError> {
        let request = VerifyRequest {
            key_id,
            message: encode_signature(digest.as_bytes()),
            message_type: "DIGEST",
            signature: encode_signature(signature),
            signing_algorithm: algorithm,
        };
        let response: VerifyResponse = self.call("verify", &request).await?;
        Ok(response.signature_valid)
    }

    async fn get_public_key(&self, key_id: &str) -> Result<PublicKey, AuthorityError> {
        let response: PublicKeyResponse =
            self.call("public-key", &PublicKeyRequest { key_id }).await?;
        decode_signature(&response.public_key)
            .map(PublicKey::from)
            .map_err(|e| AuthorityError::MalformedResponse(e.to_string()))
    }
}
