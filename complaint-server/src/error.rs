//! Unified error type for complaint-server
//!
//! `AppError` bridges handler-level failures and HTTP responses. `From`
//! impls enable `?` propagation without manual
//! `.map_err(|e| { tracing::error!(...); ... })` boilerplate.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use crate::BoxError;

/// Application error taxonomy
///
/// - `Validation`: missing/empty required field or malformed request body (400)
/// - `Auth`: login failure, bad username or password (400)
/// - `Unauthorized`: missing/invalid/expired bearer token at the gate (401)
/// - `Internal`: datastore or filesystem failure (500, auto-logged)
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(BoxError),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(source: impl Into<BoxError>) -> Self {
        AppError::Internal(source.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Invalid multipart request: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(message) | AppError::Auth(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            AppError::Internal(source) => {
                tracing::error!(error = %source, "Internal service error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "message": "Internal server error",
                        "error": source.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Convenience type alias for handler results
pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let resp = AppError::validation("Missing required fields").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let resp = AppError::Unauthorized("Missing token".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_maps_to_500() {
        let resp = AppError::internal("boom").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
