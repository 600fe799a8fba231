//! Unified API error handling
//!
//! Every endpoint returns `Result<T, ApiError>`; service errors are mapped onto
//! an HTTP status and a uniform JSON body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::extraction::ClaimExtractionError;
use crate::service::llm::GenerationError;
use crate::service::narrative::NarrativeError;
use crate::service::AuditError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// No valid claims could be extracted (422)
    #[error("Claim extraction failed: {0}")]
    ExtractionFailed(String),

    /// Generation service failure (502)
    #[error("Generation service error: {0}")]
    Upstream(String),

    /// Generation service did not answer in time (504)
    #[error("Generation service timed out: {0}")]
    Timeout(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::ExtractionFailed(_) => "extraction_failed",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Timeout(_) => "upstream_timeout",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ExtractionFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = self.error_type();

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Timeout(_) => ApiError::Timeout(err.to_string()),
            GenerationError::Request(_) | GenerationError::EmptyConversation => {
                ApiError::Upstream(err.to_string())
            }
        }
    }
}

impl From<ClaimExtractionError> for ApiError {
    fn from(err: ClaimExtractionError) -> Self {
        match err {
            ClaimExtractionError::Generation(e) => e.into(),
            ClaimExtractionError::Parse(_)
            | ClaimExtractionError::Validation(_)
            | ClaimExtractionError::RetryExhausted { .. } => {
                ApiError::ExtractionFailed(err.to_string())
            }
        }
    }
}

impl From<NarrativeError> for ApiError {
    fn from(err: NarrativeError) -> Self {
        match err {
            NarrativeError::Generation(e) => e.into(),
        }
    }
}

impl From<AuditError> for ApiError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::EmptyText
            | AuditError::InvalidExtraction(_)
            | AuditError::Prediction(_) => ApiError::BadRequest(err.to_string()),
            AuditError::Extraction(e) => e.into(),
            AuditError::Narrative(e) => e.into(),
        }
    }
}
