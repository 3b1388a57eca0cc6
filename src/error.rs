/// Unified error types for Creator Hub
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the admin API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Persistence failures
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Missing or unusable credentials
    #[error("{0}")]
    Authentication(String),

    /// Bad or expired token, or insufficient role
    #[error("{0}")]
    Authorization(String),

    /// Malformed input
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Conflict errors (e.g., duplicate username)
    #[error("{0}")]
    Conflict(String),

    /// Avatar upload/storage failures
    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JWT encoding errors
    #[error("JWT error: {0}")]
    Jwt(String),
}

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Authorization(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_)
            | ApiError::Upload(_)
            | ApiError::Internal(_)
            | ApiError::Io(_)
            | ApiError::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert ApiError to HTTP response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            ApiError::Database(e) => {
                tracing::error!(error = %e, "storage failure");
                "Database error".to_string() // Don't leak details
            }
            ApiError::Upload(_) | ApiError::Internal(_) | ApiError::Io(_) | ApiError::Jwt(_) => {
                tracing::error!(error = %self, "internal failure");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Authentication("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Authorization("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_database_error_is_generic() {
        let response = ApiError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "Database error");
    }

    #[tokio::test]
    async fn test_client_error_keeps_message() {
        let response = ApiError::NotFound("Creator not found".into()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "Creator not found");
    }
}
