//! Bounded correction loop around claim extraction
//!
//! The loop is an explicit state machine so the attempt counter and the
//! accumulated feedback conversation stay inspectable between steps.
//!
//! ```text
//! Drafting -> Validating -> Succeeded
//!                 |
//!                 v
//!          RetryPrompting -> Drafting
//!                 |
//!                 v
//!             Exhausted
//! ```

use crate::model::ClaimsExtraction;
use crate::service::extraction::ClaimExtractionError;
use crate::service::extraction::prompts::{build_extraction_prompt, build_feedback_prompt};
use crate::service::extraction::validation::parse_and_validate;
use crate::service::llm::{ChatTurn, GenerationRequest, TextGenerator};

/// Current position of the loop
#[derive(Debug)]
pub enum RetryPhase {
    /// Ready to send the conversation to the generator
    Drafting,
    /// Holding a raw response that still has to be checked
    Validating(String),
    /// Holding a rejected response and the reason it was rejected
    RetryPrompting {
        response: String,
        error: ClaimExtractionError,
    },
    /// Terminal: a validated extraction
    Succeeded(ClaimsExtraction),
    /// Terminal: the retry budget is spent
    Exhausted(ClaimExtractionError),
}

impl RetryPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RetryPhase::Drafting => "drafting",
            RetryPhase::Validating(_) => "validating",
            RetryPhase::RetryPrompting { .. } => "retry_prompting",
            RetryPhase::Succeeded(_) => "succeeded",
            RetryPhase::Exhausted(_) => "exhausted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryPhase::Succeeded(_) | RetryPhase::Exhausted(_))
    }
}

/// Per-request loop state; never shared between requests
#[derive(Debug)]
pub struct ExtractionLoop {
    phase: RetryPhase,
    source_text: String,
    conversation: Vec<ChatTurn>,
    attempts: u32,
    max_retries: u32,
    failures: Vec<ClaimExtractionError>,
}

impl ExtractionLoop {
    pub fn new(source_text: &str, max_retries: u32) -> Self {
        Self {
            phase: RetryPhase::Drafting,
            source_text: source_text.to_string(),
            conversation: vec![ChatTurn::user(build_extraction_prompt(source_text))],
            attempts: 0,
            max_retries,
            failures: Vec::new(),
        }
    }

    pub fn phase(&self) -> &RetryPhase {
        &self.phase
    }

    /// Generation requests issued so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Conversation that the next generation request will carry
    pub fn conversation(&self) -> &[ChatTurn] {
        &self.conversation
    }

    /// Every parse or validation failure seen, oldest first
    pub fn failures(&self) -> &[ClaimExtractionError] {
        &self.failures
    }

    /// Drafting: build the next request and count the attempt
    pub fn begin_attempt(&mut self, temperature: f64, max_tokens: u64) -> GenerationRequest {
        self.attempts += 1;
        GenerationRequest {
            turns: self.conversation.clone(),
            temperature,
            max_tokens,
        }
    }

    /// Drafting -> Validating
    pub fn receive_response(&mut self, response: String) {
        self.phase = RetryPhase::Validating(response);
    }

    /// Validating -> Succeeded | RetryPrompting
    pub fn validate(&mut self) {
        let phase = std::mem::replace(&mut self.phase, RetryPhase::Drafting);
        self.phase = match phase {
            RetryPhase::Validating(response) => {
                match parse_and_validate(&response, &self.source_text) {
                    Ok(extraction) => RetryPhase::Succeeded(extraction),
                    Err(error) => {
                        self.failures.push(error.clone());
                        RetryPhase::RetryPrompting { response, error }
                    }
                }
            }
            other => other,
        };
    }

    /// RetryPrompting -> Drafting | Exhausted
    ///
    /// The rejected response and a correction message are appended to the
    /// conversation so the generator sees its own mistake.
    pub fn prompt_retry(&mut self) {
        let phase = std::mem::replace(&mut self.phase, RetryPhase::Drafting);
        self.phase = match phase {
            RetryPhase::RetryPrompting { response, error } => {
                if self.attempts > self.max_retries {
                    RetryPhase::Exhausted(ClaimExtractionError::RetryExhausted {
                        attempts: self.attempts,
                        last_error: Box::new(error),
                    })
                } else {
                    self.conversation.push(ChatTurn::assistant(response));
                    self.conversation
                        .push(ChatTurn::user(build_feedback_prompt(&error)));
                    RetryPhase::Drafting
                }
            }
            other => other,
        };
    }

    /// Drive the loop to a terminal phase
    pub async fn run(
        mut self,
        generator: &dyn TextGenerator,
        temperature: f64,
        max_tokens: u64,
    ) -> Result<ClaimsExtraction, ClaimExtractionError> {
        while !self.phase().is_terminal() {
            tracing::trace!(
                phase = self.phase().name(),
                attempt = self.attempts(),
                "Extraction loop step"
            );
            match self.phase() {
                RetryPhase::Drafting => {
                    let request = self.begin_attempt(temperature, max_tokens);
                    tracing::debug!(
                        model = %generator.model(),
                        attempt = self.attempts(),
                        turns = request.turns.len(),
                        prompt_length = request.prompt_length(),
                        "Requesting claim extraction"
                    );
                    let response = generator.generate(&request).await.map_err(|e| {
                        tracing::error!(
                            model = %generator.model(),
                            attempt = self.attempts(),
                            error = %e,
                            "Claim extraction request failed"
                        );
                        ClaimExtractionError::Generation(e)
                    })?;
                    self.receive_response(response);
                }
                RetryPhase::Validating(_) => self.validate(),
                RetryPhase::RetryPrompting { error, .. } => {
                    tracing::warn!(
                        attempt = self.attempts(),
                        max_retries = self.max_retries(),
                        kind = error.kind(),
                        error = %error,
                        "Claim extraction output rejected"
                    );
                    self.prompt_retry();
                }
                RetryPhase::Succeeded(_) | RetryPhase::Exhausted(_) => {}
            }
        }

        let rejected = self.failures().len();
        let turns = self.conversation().len();
        match self.phase {
            RetryPhase::Succeeded(extraction) => {
                if self.attempts > 1 {
                    tracing::info!(
                        attempts = self.attempts,
                        rejected,
                        total_claims = extraction.total_claims,
                        "Claim extraction succeeded after retry"
                    );
                }
                Ok(extraction)
            }
            RetryPhase::Exhausted(error) => {
                tracing::error!(
                    attempts = self.attempts,
                    turns,
                    error = %error,
                    "Claim extraction retries exhausted"
                );
                Err(error)
            }
            // the loop above only exits on a terminal phase
            _ => unreachable!("extraction loop exited in a non-terminal phase"),
        }
    }
}
