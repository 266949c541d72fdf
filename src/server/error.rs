//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::repository::DbError;
use crate::services::{AuthError, ServiceError};
use crate::storage::StorageError;

/// Errors returned by JSON handlers as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// No valid session on the request.
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Please sign in to continue".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Internal(format!("Database error: {}", e))
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { .. } => Self::NotFound("File not found".to_string()),
            StorageError::AlreadyExists { .. } => Self::Conflict(e.to_string()),
            StorageError::InvalidPath(_) => Self::BadRequest(e.to_string()),
            StorageError::Io(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Database(e) => e.into(),
            ServiceError::Storage(e) => e.into(),
            ServiceError::Validation(m) => Self::BadRequest(m),
            ServiceError::NotFound(what) => Self::NotFound(format!("{} not found", what)),
            ServiceError::Forbidden(m) => Self::Forbidden(m),
            e @ ServiceError::UploadFailed { .. } => Self::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AlreadyRegistered(m) => Self::Conflict(m.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(e.to_string()),
            AuthError::Invalid { message, .. } => Self::BadRequest(message),
            AuthError::UserNotFound => Self::NotFound("User not found".to_string()),
            AuthError::Hash(_) | AuthError::Database(_) => Self::Internal(e.to_string()),
        }
    }
}
