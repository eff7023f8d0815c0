//! HTTP API server for the Vouch node.
//!
//! Provides the issuer catalog, credential verification, and a health probe.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use vouch_core::{IssuerDescriptor, VerificationResult, VerifierKind};
use vouch_verifiers::{DispatchError, SelectorError, VerificationRequest, VerifierError};

use crate::state::AppState;

// --- Request / response types ---

#[derive(Debug, Deserialize)]
pub struct IssuersQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Serialize)]
pub struct IssuersResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<IssuerDescriptor>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    detail: Option<String>,
) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            detail,
        }),
    )
}

/// Map a dispatch failure to a status code and body. Diagnostic detail is
/// only attached when `expose` is set.
fn dispatch_error_response(err: DispatchError, expose: bool) -> ApiError {
    let status = match &err {
        DispatchError::Validation(_) => StatusCode::BAD_REQUEST,
        DispatchError::Selection(e) if e.is_validation() => StatusCode::BAD_REQUEST,
        DispatchError::Selection(SelectorError::UnknownVerifier { .. }) => StatusCode::NOT_FOUND,
        DispatchError::Selection(_) => StatusCode::SERVICE_UNAVAILABLE,
        DispatchError::Verifier(VerifierError::NotImplemented(_)) => StatusCode::NOT_IMPLEMENTED,
        DispatchError::Verifier(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let detail = match &err {
        DispatchError::Selection(e) => e.detail(),
        _ => None,
    };

    if status.is_server_error() {
        tracing::error!(
            %status,
            error = %err,
            detail = detail.as_deref(),
            "verification request failed"
        );
    } else {
        tracing::info!(%status, error = %err, "verification request rejected");
    }

    error_response(status, err.to_string(), detail.filter(|_| expose))
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_issuers(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IssuersQuery>, QueryRejection>,
) -> Result<Json<IssuersResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        let detail = state.expose_diagnostics().then(|| rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, "malformed query string", detail)
    })?;

    let kind = match query.kind.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<VerifierKind>().map_err(|e| {
            error_response(StatusCode::BAD_REQUEST, e.to_string(), None)
        })?),
    };

    let data = state.catalog.list(kind);
    Ok(Json(IssuersResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

async fn handle_verification(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> Result<Json<VerificationResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        let detail = state.expose_diagnostics().then(|| rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, "malformed request body", detail)
    })?;

    state
        .dispatch
        .verify(request)
        .await
        .map(Json)
        .map_err(|e| dispatch_error_response(e, state.expose_diagnostics()))
}

// --- Server ---

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/issuers", get(handle_issuers))
        .route("/verification", post(handle_verification))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_api_server<F>(
    listen_addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
