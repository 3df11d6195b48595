//! Unified API error handling
//!
//! Every failing endpoint answers with `{"error": message, "request_id": id}`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::AnalysisError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Text missing or blank (400)
    #[error("No text provided")]
    NoText,

    /// Malformed request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Input rejected by the analyzer (400)
    #[error("{0}")]
    InvalidInput(String),

    /// Analyzer failed to initialize at startup (500)
    #[error("Sentiment analyzer not available")]
    AnalyzerUnavailable,

    /// Internal server error (500)
    #[error("Analysis failed: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoText | ApiError::BadRequest(_) | ApiError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::AnalyzerUnavailable | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), message = %self, "API error");
        } else {
            tracing::debug!(status = status.as_u16(), message = %self, "Rejected request");
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::EmptyText => ApiError::InvalidInput(err.to_string()),
        }
    }
}
