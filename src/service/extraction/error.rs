//! Error types for claim extraction

use thiserror::Error;

use crate::service::llm::GenerationError;

/// Error type for claim extraction
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ClaimExtractionError {
    /// Response payload is not valid JSON for the extraction shape
    #[error("{0}")]
    Parse(String),

    /// Payload parsed but violates the extraction invariants
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    /// Every allowed attempt produced malformed output
    #[error("Failed to get a valid claims extraction after {attempts} attempts. Last error: {last_error}")]
    RetryExhausted {
        attempts: u32,
        last_error: Box<ClaimExtractionError>,
    },

    /// Upstream generation failure, surfaced without retry
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ClaimExtractionError {
    /// Label used in retry feedback
    pub fn kind(&self) -> &'static str {
        match self {
            ClaimExtractionError::Parse(_) => "JSON parsing",
            ClaimExtractionError::Validation(_) => "Schema validation",
            ClaimExtractionError::RetryExhausted { .. } => "Retry exhausted",
            ClaimExtractionError::Generation(_) => "Generation",
        }
    }
}
