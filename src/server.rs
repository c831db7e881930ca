//! HTTP surface: ask, metrics, and health endpoints over one shared
//! [`Gateway`] instance.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::pipeline::Gateway;
use crate::types::{AskRequest, AskResponse};
use crate::Error;

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .with_state(gateway)
        .layer(CorsLayer::permissive())
}

/// Binds and serves until the process is stopped.
pub async fn serve(gateway: Arc<Gateway>, addr: &str) -> anyhow::Result<()> {
    info!(addr, cache_backend = gateway.cache_backend(), "starting gateway");
    let app = router(gateway);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn ask(
    State(gateway): State<Arc<Gateway>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    if req.query.trim().is_empty() {
        return Err(ApiError::bad_request("query must not be empty"));
    }
    let outcome = gateway.ask(&req.query, req.mode).await?;
    Ok(Json(AskResponse {
        mode: outcome.mode,
        cached: outcome.cached,
        answer: outcome.answer,
        tokens_used: outcome.tokens_used,
    }))
}

async fn metrics(State(gateway): State<Arc<Gateway>>) -> Json<crate::metrics::MetricsSnapshot> {
    Json(gateway.metrics())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "running" }))
}

/// Error-to-status mapping for the HTTP boundary. Provider failures return
/// a generic upstream indication; internals are logged, not leaked.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(message) => Self {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            Error::Provider(detail) => {
                error!(error = %detail, "generation provider failed");
                Self {
                    status: StatusCode::BAD_GATEWAY,
                    message: "generation provider failed".into(),
                }
            }
            other => {
                error!(error = %other, "internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "internal error".into(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
