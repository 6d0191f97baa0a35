//! REST API endpoints.
//!
//! Axum-based HTTP API for summoner statistics, the overall
//! aggregate, and the champion catalog.

pub mod routes;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::cache::LookupError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidIdentity(msg) => ApiError::BadRequest(msg),
            LookupError::NotFound(name) => {
                ApiError::NotFound(format!("Summoner not found: {}", name))
            }
            LookupError::FetchFailure(msg) => ApiError::Upstream(msg),
        }
    }
}

/// Assemble the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/summoners/:region/:name",
            get(routes::summoner::get_summoner).delete(routes::summoner::invalidate_summoner),
        )
        .route("/api/overview", get(routes::overview::get_overview))
        .route("/api/champions", get(routes::champions::list_champions))
        .route("/api/champions/:key", get(routes::champions::get_champion))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
