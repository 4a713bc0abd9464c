//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chgraph_core::Error;
use serde_json::json;
use thiserror::Error;

/// An error returned by a route handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Explore(#[from] Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Explore(e) => match e.code() {
                "unrecognized-url" | "malformed-record" => StatusCode::BAD_REQUEST,
                "unknown-entity" => StatusCode::NOT_FOUND,
                "already-searched" => StatusCode::CONFLICT,
                "not-searchable" | "invalid-state" | "missing-url" => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad-request",
            ApiError::Explore(e) => e.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("{}", self);
        }
        let body = json!({ "error": self.to_string(), "kind": self.kind() });
        (status, Json(body)).into_response()
    }
}
