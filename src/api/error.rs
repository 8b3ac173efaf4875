//! Mapping of failures to HTTP responses.

use crate::api::dto::ErrorResponse;
use crate::utils::error::ScorerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input rejected before it reached the core.
    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error(transparent)]
    Scorer(#[from] ScorerError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Scorer(err) => match err {
                ScorerError::InvalidInput { .. } | ScorerError::ValidationError { .. } => {
                    StatusCode::BAD_REQUEST
                }
                ScorerError::NotFound { .. } => StatusCode::NOT_FOUND,
                ScorerError::MalformedRow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ScorerError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                err if err.is_collaborator_failure() => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest { message } | Self::NotFound { message } => message.clone(),
            Self::Scorer(err) => match self.status_code() {
                StatusCode::INTERNAL_SERVER_ERROR => "An internal server error occurred".to_string(),
                _ => err.user_friendly_message(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            status_code: status.as_u16(),
            message: self.message(),
            timestamp: chrono::Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::bad_request("No content uploaded.").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ScorerError::MalformedRow {
                line: 3,
                reason: "expected 3 fields, found 2".to_string()
            })
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ScorerError::store("locked")).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(ScorerError::Cancelled).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(ScorerError::ValidationError {
                message: "x".to_string()
            })
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let err = ApiError::from(ScorerError::IoError(std::io::Error::new(
            std::io::ErrorKind::Other,
            "secret path /etc/scorers",
        )));

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "An internal server error occurred");
    }
}
