//! End-to-end audit pipeline
//!
//! text -> claim extraction -> rule evaluation + text metrics -> scoring ->
//! summary. Everything after extraction is deterministic except the summary
//! prose, which never feeds back into the score.

use std::time::Instant;

use chrono::Utc;
use thiserror::Error;

use crate::model::{AuditReport, ClaimsExtraction, PredictionAccuracy, Predictions};
use crate::service::checks::audit_claims;
use crate::service::extraction::{ClaimExtractionError, ClaimExtractionService};
use crate::service::metrics::calculate_text_metrics;
use crate::service::narrative::{NarrativeError, NarrativeService, SummaryContext};
use crate::service::prediction::{PredictionError, check_prediction_ids, compare_predictions};
use crate::service::scoring::{CheckTally, key_issues, reliability_score};

/// Texts longer than this get a notice that analysis may be slow
pub const LARGE_TEXT_WORDS: usize = 2000;
/// Texts shorter than this get a notice that few claims may be found
pub const SHORT_TEXT_WORDS: usize = 20;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum AuditError {
    #[error("Text to analyze must not be empty")]
    EmptyText,

    #[error(transparent)]
    Extraction(#[from] ClaimExtractionError),

    /// A caller-supplied extraction failed the schema gate
    #[error("Submitted extraction is invalid: {0}")]
    InvalidExtraction(ClaimExtractionError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Narrative(#[from] NarrativeError),
}

/// Validated claims plus any guidance about the input size
#[derive(Debug, Clone)]
pub struct ExtractedClaims {
    pub extraction: ClaimsExtraction,
    pub notices: Vec<String>,
}

/// Report plus the user's prediction score
#[derive(Debug, Clone)]
pub struct ComparedAudit {
    pub report: AuditReport,
    pub accuracy: PredictionAccuracy,
}

#[derive(Clone)]
pub struct AuditService {
    extraction: ClaimExtractionService,
    narrative: NarrativeService,
}

impl AuditService {
    pub fn new(extraction: ClaimExtractionService, narrative: NarrativeService) -> Self {
        Self {
            extraction,
            narrative,
        }
    }

    /// Model behind the generation calls
    pub fn model(&self) -> &str {
        self.extraction.model()
    }

    pub fn narrative(&self) -> &NarrativeService {
        &self.narrative
    }

    /// Extract claims only (first step of predict-first mode)
    pub async fn extract(&self, text: &str) -> Result<ExtractedClaims, AuditError> {
        let text = require_text(text)?;
        let notices = input_notices(text);
        let extraction = self.extraction.extract_claims(text).await?;
        Ok(ExtractedClaims {
            extraction,
            notices,
        })
    }

    /// Full audit of a text
    pub async fn audit_text(&self, text: &str) -> Result<AuditReport, AuditError> {
        let text = require_text(text)?;
        let notices = input_notices(text);
        let extraction = self.extraction.extract_claims(text).await?;
        self.build_report(text, &extraction, notices).await
    }

    /// Audit a held extraction and score the user's predictions against it
    pub async fn compare(
        &self,
        text: &str,
        extraction: &ClaimsExtraction,
        predictions: &Predictions,
    ) -> Result<ComparedAudit, AuditError> {
        let text = require_text(text)?;
        self.extraction
            .validate_submitted(extraction, text)
            .map_err(AuditError::InvalidExtraction)?;
        check_prediction_ids(
            predictions,
            extraction.claims.iter().map(|c| c.claim_id.as_str()),
        )?;

        let report = self
            .build_report(text, extraction, input_notices(text))
            .await?;
        let accuracy = compare_predictions(predictions, &report.claim_audits);

        tracing::info!(
            overall_accuracy = accuracy.overall_accuracy,
            true_positives = accuracy.true_positives,
            total_issues = accuracy.total_issues,
            "Prediction comparison completed"
        );
        Ok(ComparedAudit { report, accuracy })
    }

    async fn build_report(
        &self,
        text: &str,
        extraction: &ClaimsExtraction,
        notices: Vec<String>,
    ) -> Result<AuditReport, AuditError> {
        let start = Instant::now();

        let text_metrics = calculate_text_metrics(text);
        let claim_audits = audit_claims(&extraction.claims);
        let tally = CheckTally::from_audits(&claim_audits);
        let score = reliability_score(&text_metrics, &tally);
        let key_issues = key_issues(&claim_audits);

        let summary = self
            .narrative
            .summarize(&SummaryContext {
                text,
                metrics: &text_metrics,
                audits: &claim_audits,
                score,
                key_issues: &key_issues,
            })
            .await?;

        tracing::info!(
            claims = claim_audits.len(),
            total_checks = tally.total_checks,
            failed_checks = tally.failed_checks,
            score,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Audit report assembled"
        );

        Ok(AuditReport {
            text_metrics,
            claim_audits,
            overall_reliability_score: score,
            summary,
            key_issues,
            total_checks: tally.total_checks,
            failed_checks: tally.failed_checks,
            status_counts: tally.status_counts,
            notices,
            analyzed_at: Utc::now(),
        })
    }
}

fn require_text(text: &str) -> Result<&str, AuditError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AuditError::EmptyText);
    }
    Ok(text)
}

/// Guidance for very long or very short inputs
fn input_notices(text: &str) -> Vec<String> {
    let words = text.split_whitespace().count();
    let mut notices = Vec::new();
    if words > LARGE_TEXT_WORDS {
        tracing::warn!(words, limit = LARGE_TEXT_WORDS, "Large text submitted for audit");
        notices.push(format!(
            "Large text ({words} words). Analysis may take longer; consider auditing a shorter excerpt."
        ));
    } else if words < SHORT_TEXT_WORDS {
        tracing::warn!(words, minimum = SHORT_TEXT_WORDS, "Short text submitted for audit");
        notices.push(format!(
            "Short text ({words} words). Very short texts may not contain enough claims to analyze."
        ));
    }
    notices
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::model::{GenerationConfig, IssueType, OverallStatus};
    use crate::service::llm::testing::ScriptedGenerator;

    const TEXT: &str = "Coffee drinking causes longevity. Studies show that 90% of people who drink coffee live longer. \
                        Everyone should drink coffee every single day because it always helps.";

    const EXTRACTION: &str = r#"{"claims": [
        {"claim_id": "c1", "quote": "Coffee drinking causes longevity", "claim_type": "causal", "confidence": 0.9, "variables": ["coffee", "longevity"]},
        {"claim_id": "c2", "quote": "Studies show that 90% of people who drink coffee live longer", "claim_type": "statistical", "confidence": 0.8, "numerical_values": ["90%"]}
    ], "total_claims": 2}"#;

    const SUMMARY: &str = "This text relies on causal language and an undisclosed sample. \
                           The 90% figure lacks a baseline, so the claim is weaker than it sounds.";

    fn service(generator: Arc<ScriptedGenerator>) -> AuditService {
        let config = GenerationConfig::default();
        AuditService::new(
            ClaimExtractionService::new(generator.clone(), config.clone()),
            NarrativeService::new(generator, config),
        )
    }

    fn extraction() -> ClaimsExtraction {
        serde_json::from_str(EXTRACTION).unwrap()
    }

    #[tokio::test]
    async fn test_audit_text_end_to_end() {
        let generator = Arc::new(ScriptedGenerator::new([EXTRACTION, SUMMARY]));
        let report = service(generator.clone()).audit_text(TEXT).await.unwrap();

        assert_eq!(generator.call_count(), 2);
        assert_eq!(report.claim_audits.len(), 2);
        assert_eq!(report.claim_audits[0].claim_id, "c1");
        assert!(report.claim_audits.iter().all(|a| a.checks_performed.len() == 7));
        assert_eq!(report.total_checks, 14);
        assert!(report.failed_checks > 0);
        assert_eq!(report.summary, SUMMARY);
        assert!((0.0..=100.0).contains(&report.overall_reliability_score));
        assert!(report.key_issues.len() <= 5);
        assert!(report.notices.is_empty());
        assert_eq!(
            report.status_counts.values().sum::<usize>(),
            report.claim_audits.len()
        );
    }

    #[tokio::test]
    async fn test_empty_text_rejected_before_generation() {
        let generator = Arc::new(ScriptedGenerator::new(Vec::<String>::new()));
        let err = service(generator.clone()).audit_text("  \n ").await.unwrap_err();
        assert!(matches!(err, AuditError::EmptyText));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_extraction_yields_no_report() {
        let generator = Arc::new(ScriptedGenerator::repeating("no claims here"));
        let err = service(generator.clone()).audit_text(TEXT).await.unwrap_err();
        assert!(matches!(
            err,
            AuditError::Extraction(ClaimExtractionError::RetryExhausted { attempts: 4, .. })
        ));
        assert_eq!(generator.call_count(), 4);
    }

    #[tokio::test]
    async fn test_short_text_notice() {
        let text = "Coffee drinking causes longevity.";
        let extraction = r#"{"claims": [{"claim_id": "c1", "quote": "Coffee drinking causes longevity", "claim_type": "causal", "confidence": 0.9}], "total_claims": 1}"#;
        let generator = Arc::new(ScriptedGenerator::new([extraction, SUMMARY]));
        let report = service(generator).audit_text(text).await.unwrap();
        assert_eq!(report.notices.len(), 1);
        assert!(report.notices[0].starts_with("Short text (4 words)"));
    }

    #[tokio::test]
    async fn test_extract_returns_short_text_notice() {
        let text = "Coffee drinking causes longevity.";
        let extraction = r#"{"claims": [{"claim_id": "c1", "quote": "Coffee drinking causes longevity", "claim_type": "causal", "confidence": 0.9}], "total_claims": 1}"#;
        let generator = Arc::new(ScriptedGenerator::new([extraction]));
        let extracted = service(generator.clone()).extract(text).await.unwrap();

        assert_eq!(generator.call_count(), 1);
        assert_eq!(extracted.extraction.claims[0].claim_id, "c1");
        assert_eq!(extracted.notices.len(), 1);
        assert!(extracted.notices[0].starts_with("Short text (4 words)"));
    }

    #[tokio::test]
    async fn test_extract_without_notices() {
        let generator = Arc::new(ScriptedGenerator::new([EXTRACTION]));
        let extracted = service(generator).extract(TEXT).await.unwrap();
        assert_eq!(extracted.extraction, extraction());
        assert!(extracted.notices.is_empty());
    }

    #[test]
    fn test_large_text_notice() {
        let text = "word ".repeat(LARGE_TEXT_WORDS + 1);
        let notices = input_notices(&text);
        assert!(notices[0].starts_with("Large text (2001 words)"));
        assert!(input_notices(&"word ".repeat(100)).is_empty());
    }

    #[tokio::test]
    async fn test_compare_uses_submitted_extraction() {
        let generator = Arc::new(ScriptedGenerator::new([SUMMARY]));
        let service = service(generator.clone());

        let mut predictions = Predictions::new();
        predictions.insert(
            "c1".to_string(),
            HashMap::from([(IssueType::Correlation, true), (IssueType::SampleSize, false)]),
        );

        let compared = service
            .compare(TEXT, &extraction(), &predictions)
            .await
            .unwrap();

        // only the summary is generated
        assert_eq!(generator.call_count(), 1);
        let c1 = &compared.report.claim_audits[0];
        assert_ne!(c1.overall_status(), OverallStatus::Clean);
        assert!(compared.accuracy.per_claim.contains_key("c1"));
        assert!(!compared.accuracy.per_claim.contains_key("c2"));
        assert!(
            compared.accuracy.per_claim["c1"]
                .caught
                .contains(&IssueType::Correlation)
        );
    }

    #[tokio::test]
    async fn test_compare_rejects_invalid_extraction() {
        let generator = Arc::new(ScriptedGenerator::new([SUMMARY]));
        let mut bad = extraction();
        bad.total_claims = 5;
        let err = service(generator.clone())
            .compare(TEXT, &bad, &Predictions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::InvalidExtraction(_)));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_compare_rejects_unknown_claim() {
        let generator = Arc::new(ScriptedGenerator::new([SUMMARY]));
        let mut predictions = Predictions::new();
        predictions.insert("c7".to_string(), HashMap::new());
        let err = service(generator.clone())
            .compare(TEXT, &extraction(), &predictions)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuditError::Prediction(PredictionError::UnknownClaim(_))
        ));
        assert_eq!(generator.call_count(), 0);
    }
}
