use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use thiserror::Error;

use crate::recommender::RecommenderError;
use crate::responses::responses::MessageResponse;

/// Error taxonomy for every request path. Each variant maps to one HTTP
/// status and a `{"message": ...}` JSON body; nothing is retried.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input (400)
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or an unusable token (401)
    #[error("{0}")]
    Auth(String),

    /// Duplicate username (400)
    #[error("{0}")]
    Conflict(String),

    /// Missing user, song or track (404)
    #[error("{0}")]
    NotFound(String),

    /// Database operation error (500)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Recommendation provider failure (502)
    #[error("Recommendation provider error: {0}")]
    Provider(#[from] RecommenderError),

    /// Anything else that should not leak details to the caller (500)
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Auth(message) => (StatusCode::UNAUTHORIZED, message),
            ApiError::Conflict(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Database(err) => {
                error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Provider(err) => {
                error!("Recommendation provider error: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "Recommendation provider request failed".to_string(),
                )
            }
            ApiError::Internal(message) => {
                error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(MessageResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Validation("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Auth("no".to_string()), StatusCode::UNAUTHORIZED),
            (
                ApiError::Conflict("taken".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::NotFound("gone".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_provider_error_maps_to_bad_gateway() {
        let err = ApiError::from(RecommenderError::Network("timed out".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
