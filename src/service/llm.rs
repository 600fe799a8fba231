//! Text generation service contract and the OpenAI-backed client
//!
//! The audit pipeline only needs "send an ordered conversation, get free text
//! back". [`TextGenerator`] captures that contract so the extraction loop and
//! the narrative features can be driven by scripted stubs in tests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::{Chat, Message};
use rig::providers::openai;

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation sent to the generator
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A single generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Ordered conversation; the last turn is the one being answered
    pub turns: Vec<ChatTurn>,
    pub temperature: f64,
    pub max_tokens: u64,
}

impl GenerationRequest {
    pub fn prompt_length(&self) -> usize {
        self.turns.iter().map(|t| t.content.len()).sum()
    }
}

/// Failures of the generation service itself. Never retried by the core.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Generation request timed out after {0}s")]
    Timeout(u64),

    #[error("Generation request has no conversation turns")]
    EmptyConversation,
}

/// Anything that can answer a conversation with free text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
    model: String,
    timeout: Duration,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, String> {
        let client = openai::Client::new(api_key)
            .map_err(|e| format!("Failed to create OpenAI client: {}", e))?;

        Ok(Self {
            client,
            model: model.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let (last, earlier) = request
            .turns
            .split_last()
            .ok_or(GenerationError::EmptyConversation)?;

        let history: Vec<Message> = earlier.iter().map(to_message).collect();
        let prompt = to_message(last);

        let agent = self
            .client
            .agent(&self.model)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build();

        let start_time = Instant::now();
        tracing::debug!(
            model = %self.model,
            turns = request.turns.len(),
            prompt_length = request.prompt_length(),
            "Initiating generation request"
        );

        let result = tokio::time::timeout(self.timeout, agent.chat(prompt, history)).await;
        let elapsed_ms = start_time.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(text)) => {
                tracing::info!(
                    model = %self.model,
                    elapsed_ms = elapsed_ms,
                    response_length = text.len(),
                    "Generation request completed"
                );
                Ok(text)
            }
            Ok(Err(e)) => {
                tracing::error!(
                    model = %self.model,
                    elapsed_ms = elapsed_ms,
                    error = %e,
                    "Generation request failed"
                );
                Err(GenerationError::Request(e.to_string()))
            }
            Err(_) => {
                tracing::error!(
                    model = %self.model,
                    timeout_secs = self.timeout.as_secs(),
                    "Generation request timed out"
                );
                Err(GenerationError::Timeout(self.timeout.as_secs()))
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn to_message(turn: &ChatTurn) -> Message {
    match turn.role {
        Role::User => Message::user(turn.content.clone()),
        Role::Assistant => Message::assistant(turn.content.clone()),
    }
}
