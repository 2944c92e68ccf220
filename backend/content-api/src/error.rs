/// Error types for content-api
///
/// One error enum for the whole service. The `ResponseError` impl is the
/// single place request failures are serialized, so every error leaves the
/// boundary in the same envelope: `{statusCode, message, success: false}`.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, empty, or malformed input
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid bearer credential
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not the resource owner
    #[error("{0}")]
    Forbidden(String),

    /// Resource identifier does not resolve
    #[error("{0}")]
    NotFound(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Object-storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Anything unexpected caught at the boundary
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    status_code: u16,
    message: String,
    success: bool,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(ErrorEnvelope {
            status_code: status.as_u16(),
            message: self.to_string(),
            success: false,
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Storage("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = ErrorEnvelope {
            status_code: 403,
            message: "You do not own this tweet".to_string(),
            success: false,
        };
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["statusCode"], 403);
        assert_eq!(json["message"], "You do not own this tweet");
        assert_eq!(json["success"], false);
    }

    #[test]
    fn test_client_error_messages_pass_through() {
        // Validation and ownership failures carry their message unprefixed
        assert_eq!(
            AppError::Validation("Tweet content must not be empty".into()).to_string(),
            "Tweet content must not be empty"
        );
        assert_eq!(
            AppError::NotFound("Tweet not found".into()).to_string(),
            "Tweet not found"
        );
    }
}
