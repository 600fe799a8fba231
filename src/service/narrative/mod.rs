//! Free-text prose around the audit: the summary and counterfactual alternatives
//!
//! Neither output feeds back into scoring.

pub mod prompts;

use std::sync::{Arc, LazyLock};
use std::time::Instant;

use regex::Regex;
use thiserror::Error;

use crate::model::{ClaimAudit, GenerationConfig, TextMetrics};
use crate::service::llm::{ChatTurn, GenerationError, GenerationRequest, TextGenerator};

/// Summaries shorter than this are replaced by the deterministic fallback
pub const MIN_SUMMARY_CHARS: usize = 50;

/// Maximum number of counterfactual alternatives returned
pub const MAX_ALTERNATIVES: usize = 4;

/// Line-leading list marker: `1.`, `2)`, `-`, `*` or `•`
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:\d+[.)]|[•*-])[ \t]+").expect("list marker regex is valid")
});

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum NarrativeError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Inputs the summary is written from
pub struct SummaryContext<'a> {
    pub text: &'a str,
    pub metrics: &'a TextMetrics,
    pub audits: &'a [ClaimAudit],
    pub score: f64,
    pub key_issues: &'a [String],
}

#[derive(Clone)]
pub struct NarrativeService {
    generator: Arc<dyn TextGenerator>,
    config: GenerationConfig,
}

impl NarrativeService {
    pub fn new(generator: Arc<dyn TextGenerator>, config: GenerationConfig) -> Self {
        Self { generator, config }
    }

    /// Plain-language summary of the audit
    pub async fn summarize(&self, context: &SummaryContext<'_>) -> Result<String, NarrativeError> {
        let prompt = prompts::build_summary_prompt(context.text, context.metrics, context.audits);
        let request = GenerationRequest {
            turns: vec![ChatTurn::user(prompt)],
            temperature: self.config.summary_temperature,
            max_tokens: self.config.summary_max_tokens,
        };

        let summary = self.generate(&request, "summary").await?;
        let summary = summary.trim();
        if summary.chars().count() < MIN_SUMMARY_CHARS {
            tracing::warn!(
                model = %self.generator.model(),
                summary_length = summary.len(),
                "Generated summary too short, using fallback summary"
            );
            return Ok(fallback_summary(context));
        }
        Ok(summary.to_string())
    }

    /// Alternative explanations for a failed check on one claim
    pub async fn counterfactuals(
        &self,
        claim_quote: &str,
        check_name: &str,
        explanation: &str,
    ) -> Result<Vec<String>, NarrativeError> {
        let prompt = prompts::build_counterfactual_prompt(claim_quote, check_name, explanation);
        let request = GenerationRequest {
            turns: vec![ChatTurn::user(prompt)],
            temperature: self.config.counterfactual_temperature,
            max_tokens: self.config.counterfactual_max_tokens,
        };

        let response = self.generate(&request, "counterfactual").await?;
        let alternatives = parse_alternatives(&response);
        tracing::debug!(
            check_name = %check_name,
            alternatives = alternatives.len(),
            "Parsed counterfactual alternatives"
        );
        Ok(alternatives)
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        purpose: &'static str,
    ) -> Result<String, NarrativeError> {
        let start = Instant::now();
        let result = self.generator.generate(request).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                tracing::info!(
                    model = %self.generator.model(),
                    purpose,
                    prompt_length = request.prompt_length(),
                    response_length = text.len(),
                    elapsed_ms,
                    "Narrative generation completed"
                );
                Ok(text)
            }
            Err(e) => {
                tracing::error!(
                    model = %self.generator.model(),
                    purpose,
                    elapsed_ms,
                    error = %e,
                    "Narrative generation failed"
                );
                Err(e.into())
            }
        }
    }
}

/// Split a numbered or bulleted response into at most [`MAX_ALTERNATIVES`] items
///
/// Text before the first marker is dropped. With fewer than two marked items
/// the response is split on lines instead.
pub fn parse_alternatives(response: &str) -> Vec<String> {
    let response = response.trim();
    let markers: Vec<_> = LIST_MARKER.find_iter(response).collect();

    let mut alternatives: Vec<String> = Vec::new();
    if markers.len() >= 2 {
        for (i, marker) in markers.iter().enumerate() {
            let end = markers
                .get(i + 1)
                .map(|next| next.start())
                .unwrap_or(response.len());
            let item = response[marker.end()..end].trim();
            if !item.is_empty() {
                alternatives.push(item.to_string());
            }
        }
    }

    if alternatives.len() < 2 {
        alternatives = response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
    }

    alternatives.truncate(MAX_ALTERNATIVES);
    alternatives
}

/// Summary assembled from the computed figures alone
pub fn fallback_summary(context: &SummaryContext<'_>) -> String {
    let metrics = context.metrics;
    let mut summary = format!(
        "Reliability score: {:.0}/100. {:.0}% of sentences contain numbers or statistics, \
         vagueness is {:.0}%, {} extreme term(s) and {} causal phrase(s) were found, \
         and the sample size is {}.",
        context.score,
        metrics.data_density_score * 100.0,
        metrics.vagueness_score * 100.0,
        metrics.extreme_language_count,
        metrics.causation_language_count,
        if metrics.sample_size_mentioned {
            "mentioned"
        } else {
            "not mentioned"
        },
    );

    if context.key_issues.is_empty() {
        summary.push_str(" No statistical issues were flagged in the extracted claims.");
    } else {
        summary.push_str(" Key issues: ");
        summary.push_str(&context.key_issues.join("; "));
        summary.push('.');
    }
    summary
}
