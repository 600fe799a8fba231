//! Claim extraction service
//!
//! Turns free text into a validated [`ClaimsExtraction`] by driving the
//! generator through the bounded correction loop in [`retry`].

pub mod error;
pub mod prompts;
pub mod retry;
pub mod validation;

use std::sync::Arc;
use std::time::Instant;

pub use error::ClaimExtractionError;

use crate::model::{ClaimsExtraction, GenerationConfig};
use crate::service::llm::TextGenerator;
use retry::ExtractionLoop;
use validation::validate_extraction;

/// Claim extraction service backed by a text generator
#[derive(Clone)]
pub struct ClaimExtractionService {
    generator: Arc<dyn TextGenerator>,
    config: GenerationConfig,
}

impl ClaimExtractionService {
    pub fn new(generator: Arc<dyn TextGenerator>, config: GenerationConfig) -> Self {
        Self { generator, config }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Extract claims from `text`, retrying on malformed output
    pub async fn extract_claims(
        &self,
        text: &str,
    ) -> Result<ClaimsExtraction, ClaimExtractionError> {
        let start = Instant::now();
        tracing::info!(
            model = %self.generator.model(),
            text_length = text.len(),
            max_retries = self.config.max_retries,
            "Starting claim extraction"
        );

        let extraction = ExtractionLoop::new(text, self.config.max_retries)
            .run(
                self.generator.as_ref(),
                self.config.extraction_temperature,
                self.config.extraction_max_tokens,
            )
            .await?;

        tracing::info!(
            total_claims = extraction.claims.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Claim extraction completed"
        );
        Ok(extraction)
    }

    /// Check an extraction submitted by a caller against the same invariants
    /// the generator output must satisfy
    pub fn validate_submitted(
        &self,
        extraction: &ClaimsExtraction,
        text: &str,
    ) -> Result<(), ClaimExtractionError> {
        validate_extraction(extraction, text).into_result()
    }
}
