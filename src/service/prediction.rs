//! Predict-first mode: compares user-flagged issues with the audit's failed checks

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::model::{
    ClaimAudit, ClaimPredictionOutcome, IssueType, PredictionAccuracy, Predictions, TypeAccuracy,
};

/// Per-type accuracy at or above this is called out as consistent
const CONSISTENT_ACCURACY: f64 = 0.8;
/// Per-type accuracy below this (with enough samples) needs practice
const WEAK_ACCURACY: f64 = 0.5;
const MIN_SAMPLES_FOR_WEAKNESS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PredictionError {
    #[error("Prediction refers to unknown claim '{0}'")]
    UnknownClaim(String),
}

/// Map a failed check name onto the first issue type whose check name it contains
pub fn issue_type_for_check(check_name: &str) -> Option<IssueType> {
    IssueType::ALL
        .into_iter()
        .find(|issue| check_name.contains(issue.check_name().as_str()))
}

/// Reject predictions keyed by claim ids the audit does not know
pub fn check_prediction_ids<'a>(
    predictions: &Predictions,
    claim_ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), PredictionError> {
    let known: BTreeSet<&str> = claim_ids.into_iter().collect();
    let mut unknown: Vec<&String> = predictions
        .keys()
        .filter(|id| !known.contains(id.as_str()))
        .collect();
    unknown.sort();
    match unknown.first() {
        Some(id) => Err(PredictionError::UnknownClaim((*id).clone())),
        None => Ok(()),
    }
}

/// Score user predictions against the audit
///
/// Claims the user did not review (absent from `predictions`) are skipped.
pub fn compare_predictions(predictions: &Predictions, audits: &[ClaimAudit]) -> PredictionAccuracy {
    let mut true_positives = 0;
    let mut false_positives = 0;
    let mut false_negatives = 0;
    let mut total_issues = 0;
    let mut per_claim = BTreeMap::new();
    let mut by_type: BTreeMap<IssueType, TypeAccuracy> = IssueType::ALL
        .into_iter()
        .map(|issue| (issue, TypeAccuracy::default()))
        .collect();

    for audit in audits {
        let Some(flags) = predictions.get(&audit.claim_id) else {
            continue;
        };

        let predicted: BTreeSet<IssueType> = flags
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(issue, _)| *issue)
            .collect();
        let actual: BTreeSet<IssueType> = audit
            .failed_checks()
            .filter_map(|check| issue_type_for_check(check.check_name.as_str()))
            .collect();

        let caught: Vec<IssueType> = predicted.intersection(&actual).copied().collect();
        let missed: Vec<IssueType> = actual.difference(&predicted).copied().collect();
        let wrong: Vec<IssueType> = predicted.difference(&actual).copied().collect();

        total_issues += actual.len();
        true_positives += caught.len();
        false_positives += wrong.len();
        false_negatives += missed.len();

        for issue in &actual {
            let entry = by_type.entry(*issue).or_default();
            entry.total += 1;
            if predicted.contains(issue) {
                entry.caught += 1;
            }
        }

        per_claim.insert(
            audit.claim_id.clone(),
            ClaimPredictionOutcome {
                quote: audit.claim_quote.clone(),
                predicted: predicted.into_iter().collect(),
                actual: actual.into_iter().collect(),
                caught,
                missed,
                false_positives: wrong,
            },
        );
    }

    let overall_accuracy = if total_issues > 0 {
        true_positives as f64 / total_issues as f64
    } else {
        0.0
    };

    tracing::debug!(
        reviewed_claims = per_claim.len(),
        true_positives,
        total_issues,
        "Compared predictions with audit"
    );

    let insights = learning_insights(&by_type);
    PredictionAccuracy {
        overall_accuracy,
        true_positives,
        false_positives,
        false_negatives,
        total_issues,
        per_claim,
        by_type,
        insights,
    }
}

fn learning_insights(by_type: &BTreeMap<IssueType, TypeAccuracy>) -> Vec<String> {
    let mut insights = Vec::new();
    for (issue, accuracy) in by_type {
        if accuracy.total == 0 {
            continue;
        }
        let rate = accuracy.caught as f64 / accuracy.total as f64;
        if rate >= CONSISTENT_ACCURACY {
            insights.push(format!(
                "{}: Excellent! You're catching these consistently.",
                issue.label()
            ));
        } else if rate < WEAK_ACCURACY && accuracy.total >= MIN_SAMPLES_FOR_WEAKNESS {
            insights.push(format!(
                "{}: Room for improvement. Pay closer attention to this pattern.",
                issue.label()
            ));
        }
    }
    if insights.is_empty() {
        insights.push("Keep practicing to build your critical thinking skills!".to_string());
    }
    insights
}
