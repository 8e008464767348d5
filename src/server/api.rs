use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use genie_common::{GenerationRequest, OutputSpec};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::errors::GenieError;
use crate::pipeline::Pipeline;

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub pipeline: Pipeline,
    pub request_timeout: Duration,
    /// Cancelled on shutdown; each request runs under a child token.
    pub shutdown: CancellationToken,
}

pub type SharedState = Arc<AppState>;

// ── Request payload types ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub user: String,
    #[serde(alias = "name")]
    pub repo: String,
    #[serde(rename = "type")]
    pub output_type: String,
}

impl RunRequest {
    pub fn into_generation_request(self) -> Result<GenerationRequest, GenieError> {
        let user = self.user.trim();
        let repo = self.repo.trim();
        if user.is_empty() {
            return Err(GenieError::InvalidRequest("user cannot be empty".into()));
        }
        if repo.is_empty() {
            return Err(GenieError::InvalidRequest("repo cannot be empty".into()));
        }
        let output: OutputSpec = self
            .output_type
            .parse()
            .map_err(|e: genie_common::OutputSpecError| GenieError::InvalidRequest(e.to_string()))?;
        Ok(GenerationRequest::new(user, repo, output))
    }
}

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    BadGateway(String),
    GatewayTimeout(String),
    Unavailable(String),
    Internal(String),
}

impl From<GenieError> for ApiError {
    fn from(err: GenieError) -> Self {
        let message = err.to_string();
        match err {
            GenieError::UserNotFound { .. } | GenieError::RepositoryNotFound { .. } => {
                ApiError::NotFound(message)
            }
            GenieError::InvalidRequest(_) => ApiError::BadRequest(message),
            GenieError::HostingApi(_) | GenieError::FinalCompletionFailed(_) => {
                ApiError::BadGateway(message)
            }
            GenieError::Timeout { .. } => ApiError::GatewayTimeout(message),
            GenieError::Cancelled => ApiError::Unavailable(message),
            GenieError::Other(e) => ApiError::Internal(format!("{:#}", e)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/run", post(run_generation))
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn run_generation(
    State(state): State<SharedState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = body.into_generation_request()?;
    let cancel = state.shutdown.child_token();

    let result = match tokio::time::timeout(
        state.request_timeout,
        state.pipeline.run(&request, &cancel),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(GenieError::Timeout {
            secs: state.request_timeout.as_secs(),
        }),
    };

    match result {
        Ok(outcome) => {
            tracing::info!(
                user = %request.user,
                repository = %request.repository,
                route = ?outcome.route,
                chars = outcome.text.len(),
                "Generation complete"
            );
            Ok((
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                outcome.text,
            ))
        }
        Err(e) => {
            tracing::warn!(
                user = %request.user,
                repository = %request.repository,
                error = %e,
                "Generation failed"
            );
            Err(e.into())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
