//! Application state and service initialization
//!
//! Builds the generation client and the services that share it, so handlers
//! only ever see ready-made services.

use std::sync::Arc;

use crate::model::Config;
use crate::service::{
    AuditService, ClaimExtractionService, LlmClient, NarrativeService, TextGenerator,
};

/// Environment variable holding the generation service credential
const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Application state containing all services
pub struct AppState {
    pub audit_service: AuditService,
}

impl AppState {
    /// Initialize all services
    ///
    /// Fails when `OPENAI_API_KEY` is absent: nothing can be audited without
    /// the generation service.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = std::env::var(ENV_OPENAI_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AppError::MissingConfig(ENV_OPENAI_API_KEY))?;

        let generation = &config.generation;
        let llm_client = LlmClient::new(&api_key, &generation.model, generation.timeout_secs)
            .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

        tracing::info!(
            model = %generation.model,
            max_retries = generation.max_retries,
            timeout_secs = generation.timeout_secs,
            "Generation client initialized"
        );

        Ok(Self::with_generator(Arc::new(llm_client), config))
    }

    /// Build the service graph around any generator
    pub fn with_generator(generator: Arc<dyn TextGenerator>, config: &Config) -> Self {
        let extraction =
            ClaimExtractionService::new(Arc::clone(&generator), config.generation.clone());
        let narrative = NarrativeService::new(generator, config.generation.clone());

        Self {
            audit_service: AuditService::new(extraction, narrative),
        }
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::llm::testing::ScriptedGenerator;

    #[test]
    fn test_with_generator_wires_model() {
        let state = AppState::with_generator(
            Arc::new(ScriptedGenerator::new(Vec::<String>::new())),
            &Config::default(),
        );
        assert_eq!(state.audit_service.model(), "scripted");
    }
}
