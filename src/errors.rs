//! Centralized error handling.
//!
//! One error type for the whole application, translated into the
//! response envelope (`{"success": false, "msg": ...}`) on the way out.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error taxonomy.
///
/// Every service failure is one of these variants; raw persistence
/// errors never cross the HTTP boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or out-of-range input (422).
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or missing/invalid token (401).
    #[error("{0}")]
    Auth(String),

    /// Authenticated but not permitted to perform the action (401).
    #[error("{0}")]
    PolicyDenied(String),

    /// Target entity does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Operation not valid for the entity's current state (400).
    #[error("{0}")]
    InvalidState(String),

    /// An update request carried no effective changes.
    ///
    /// Mapped to 404 by convention ("Not Found Data in Request"), not a
    /// true missing-resource error.
    #[error("no data found in request")]
    NoChange,

    /// Unexpected persistence failure (500, detail logged, not exposed).
    #[error("database error")]
    Database(#[from] sea_orm::DbErr),

    /// Token encoding/decoding failure (401).
    #[error("authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Any other unexpected failure (500).
    #[error("internal server error")]
    Internal(String),
}

impl AppError {
    /// HTTP status for each variant.
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Auth(_) | AppError::PolicyDenied(_) | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) | AppError::NoChange => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message; internal details are logged and replaced.
    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::NoChange => "Not Found Data in Request".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        AppError::Auth(msg.into())
    }

    pub fn denied(msg: impl Into<String>) -> Self {
        AppError::PolicyDenied(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        AppError::InvalidState(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "success": false,
            "msg": self.user_message(),
        });
        (status, Json(body)).into_response()
    }
}

/// Result type alias used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        assert_eq!(
            AppError::validation("bad").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::auth("no").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::denied("no").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::not_found("gone").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NoChange.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::invalid_state("state").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_hidden() {
        let msg = AppError::internal("connection pool exhausted").user_message();
        assert!(!msg.contains("pool"));
    }
}
