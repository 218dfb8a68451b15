//! HTTP routes and handlers.
//!
//! Each handler runs its orchestrator call on a spawned task and waits for it
//! under the request deadline. If the deadline passes or the client goes
//! away, the task finishes on its own and its result is discarded. Spawned
//! tasks are tracked so shutdown can wait for them before releasing clients.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio_util::task::TaskTracker;

use certifier::{CertificationResult, Certifier, PublicKeyCache, VerificationOutcome};

use crate::error::ApiError;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    certifier: Certifier,
    key_cache: Option<Arc<PublicKeyCache>>,
    request_timeout: Duration,
    tasks: TaskTracker,
}

impl AppState {
    pub fn new(certifier: Certifier, request_timeout: Duration) -> Self {
        Self {
            certifier,
            key_cache: None,
            request_timeout,
            tasks: TaskTracker::new(),
        }
    }

    /// Serve the public key through `cache`.
    pub fn with_key_cache(mut self, cache: Arc<PublicKeyCache>) -> Self {
        self.key_cache = Some(cache);
        self
    }

    /// Tracker for every orchestrator task spawned by a handler.
    pub fn tasks(&self) -> &TaskTracker {
        &self.tasks
    }
}

/// Build the router.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/certify", post(certify))
        .route("/verify", post(verify_digest))
        .route("/verify/content", post(verify_content))
        .route("/public-key", get(public_key))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Run `fut` on a task owned by `tasks`, bounded by `deadline`.
async fn detached<T, F>(tasks: &TaskTracker, deadline: Duration, fut: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: Future<Output = certifier::Result<T>> + Send + 'static,
{
    let task = tasks.spawn(fut);
    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(result)) => result.map_err(ApiError::from),
        Ok(Err(join)) => Err(ApiError::Task(join.to_string())),
        Err(_) => Err(ApiError::Timeout),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /certify
async fn certify(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CertificationResult>, ApiError> {
    let certifier = state.certifier.clone();
    let result = detached(&state.tasks, state.request_timeout, async move {
        certifier.certify(&body).await
    })
    .await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDigestRequest {
    pub signature: String,
    pub digest_hex: String,
}

/// POST /verify
async fn verify_digest(
    State(state): State<AppState>,
    Json(request): Json<VerifyDigestRequest>,
) -> Result<Json<VerificationOutcome>, ApiError> {
    let certifier = state.certifier.clone();
    let outcome = detached(&state.tasks, state.request_timeout, async move {
        certifier
            .verify_digest(&request.signature, &request.digest_hex)
            .await
    })
    .await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct SignatureQuery {
    pub signature: String,
}

/// POST /verify/content?signature=...
async fn verify_content(
    State(state): State<AppState>,
    Query(query): Query<SignatureQuery>,
    body: Bytes,
) -> Result<Json<VerificationOutcome>, ApiError> {
    let certifier = state.certifier.clone();
    let outcome = detached(&state.tasks, state.request_timeout, async move {
        certifier.verify_content(&query.signature, &body).await
    })
    .await?;
    Ok(Json(outcome))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    pub public_key: String,
}

/// GET /public-key
async fn public_key(State(state): State<AppState>) -> Result<Json<PublicKeyResponse>, ApiError> {
    let certifier = state.certifier.clone();
    let cache = state.key_cache.clone();
    let public_key = detached(&state.tasks, state.request_timeout, async move {
        match cache {
            Some(cache) => {
                cache
                    .get_or_fetch(certifier.key().key_id(), || certifier.public_key())
                    .await
            }
            None => certifier.public_key().await,
        }
    })
    .await?;
    Ok(Json(PublicKeyResponse { public_key }))
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}
