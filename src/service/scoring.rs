//! Aggregation of per-claim verdicts and text metrics into report-level figures

use std::collections::BTreeMap;

use crate::model::{ClaimAudit, OverallStatus, TextMetrics};

const NEUTRAL_SCORE: f64 = 50.0;
const DATA_DENSITY_WEIGHT: f64 = 20.0;
const VAGUENESS_WEIGHT: f64 = 15.0;
const SAMPLE_SIZE_BONUS: f64 = 10.0;
const EXTREME_TERM_PENALTY: f64 = 2.0;
const MAX_EXTREME_PENALTY: f64 = 15.0;
const FAILURE_RATE_WEIGHT: f64 = 30.0;

/// Maximum number of entries in `key_issues`
pub const MAX_KEY_ISSUES: usize = 5;

/// Check counts across all claim audits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckTally {
    pub total_checks: usize,
    pub failed_checks: usize,
    pub status_counts: BTreeMap<OverallStatus, usize>,
}

impl CheckTally {
    pub fn from_audits(audits: &[ClaimAudit]) -> Self {
        let mut tally = Self::default();
        for audit in audits {
            tally.total_checks += audit.checks_performed.len();
            tally.failed_checks += audit.failed_count();
            *tally.status_counts.entry(audit.overall_status()).or_default() += 1;
        }
        tally
    }

    /// Failed share of all checks, 0 when nothing was checked
    pub fn failure_rate(&self) -> f64 {
        if self.total_checks == 0 {
            0.0
        } else {
            self.failed_checks as f64 / self.total_checks as f64
        }
    }
}

/// Overall reliability score in [0, 100]
///
/// Linear in each input: density and a disclosed sample size raise it,
/// vagueness, extreme terms (capped) and the failed-check ratio lower it.
pub fn reliability_score(metrics: &TextMetrics, tally: &CheckTally) -> f64 {
    let mut score = NEUTRAL_SCORE;
    score += metrics.data_density_score * DATA_DENSITY_WEIGHT;
    score -= metrics.vagueness_score * VAGUENESS_WEIGHT;
    if metrics.sample_size_mentioned {
        score += SAMPLE_SIZE_BONUS;
    }
    score -= (metrics.extreme_language_count as f64 * EXTREME_TERM_PENALTY).min(MAX_EXTREME_PENALTY);
    score -= tally.failure_rate() * FAILURE_RATE_WEIGHT;
    score.clamp(0.0, 100.0)
}

/// Most severe failed checks, formatted `"<claim id>: <check> (<severity>)"`
///
/// Ties keep claim order, then rule order.
pub fn key_issues(audits: &[ClaimAudit]) -> Vec<String> {
    let mut failed: Vec<_> = audits
        .iter()
        .flat_map(|audit| audit.failed_checks().map(move |check| (audit, check)))
        .collect();
    // stable sort keeps the claim/rule order among equal severities
    failed.sort_by(|(_, a), (_, b)| b.severity.cmp(&a.severity));

    failed
        .into_iter()
        .take(MAX_KEY_ISSUES)
        .map(|(audit, check)| {
            format!(
                "{}: {} ({})",
                audit.claim_id, check.check_name, check.severity
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CheckName, Severity, StatisticalCheck};

    fn metrics() -> TextMetrics {
        TextMetrics {
            data_density_score: 0.5,
            vagueness_score: 0.2,
            extreme_language_count: 1,
            sample_size_mentioned: false,
            causation_language_count: 0,
        }
    }

    fn audit(id: &str, checks: Vec<StatisticalCheck>) -> ClaimAudit {
        ClaimAudit {
            claim_id: id.to_string(),
            claim_quote: format!("quote for {id}"),
            checks_performed: checks,
        }
    }

    fn failed(name: CheckName, severity: Severity) -> StatisticalCheck {
        StatisticalCheck::fail(name, severity, "problem", "fix it")
    }

    fn passed(name: CheckName) -> StatisticalCheck {
        StatisticalCheck::pass(name, "ok")
    }

    fn tally(failed_checks: usize, total_checks: usize) -> CheckTally {
        CheckTally {
            total_checks,
            failed_checks,
            status_counts: BTreeMap::new(),
        }
    }

    #[test]
    fn test_score_formula() {
        // 50 + 10 - 3 - 2 - (1/4)*30
        let score = reliability_score(&metrics(), &tally(1, 4));
        assert!((score - 47.5).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_score_without_checks_skips_failure_penalty() {
        let score = reliability_score(&metrics(), &tally(0, 0));
        assert!((score - 55.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_score_is_clamped() {
        let best = TextMetrics {
            data_density_score: 1.0,
            vagueness_score: 0.0,
            extreme_language_count: 0,
            sample_size_mentioned: true,
            causation_language_count: 0,
        };
        assert_eq!(reliability_score(&best, &tally(0, 7)), 80.0);

        let worst = TextMetrics {
            data_density_score: 0.0,
            vagueness_score: 1.0,
            extreme_language_count: 50,
            sample_size_mentioned: false,
            causation_language_count: 9,
        };
        assert_eq!(reliability_score(&worst, &tally(7, 7)), 0.0);
    }

    #[test]
    fn test_extreme_penalty_is_capped() {
        let mut a = metrics();
        a.extreme_language_count = 8;
        let mut b = metrics();
        b.extreme_language_count = 40;
        assert_eq!(
            reliability_score(&a, &tally(0, 7)),
            reliability_score(&b, &tally(0, 7))
        );
    }

    #[test]
    fn test_score_monotonicity() {
        let base = metrics();
        let t = tally(2, 7);
        let score = reliability_score(&base, &t);

        let mut denser = base.clone();
        denser.data_density_score = 0.9;
        assert!(reliability_score(&denser, &t) >= score);

        let mut sampled = base.clone();
        sampled.sample_size_mentioned = true;
        assert!(reliability_score(&sampled, &t) >= score);

        let mut vaguer = base.clone();
        vaguer.vagueness_score = 0.9;
        assert!(reliability_score(&vaguer, &t) <= score);

        let mut extreme = base.clone();
        extreme.extreme_language_count = 4;
        assert!(reliability_score(&extreme, &t) <= score);

        assert!(reliability_score(&base, &tally(5, 7)) <= score);
    }

    #[test]
    fn test_tally_counts_checks_and_statuses() {
        let audits = vec![
            audit(
                "c1",
                vec![
                    passed(CheckName::CorrelationVsCausation),
                    failed(CheckName::SampleSizeDisclosure, Severity::Medium),
                ],
            ),
            audit("c2", vec![passed(CheckName::CorrelationVsCausation)]),
            audit("c3", vec![failed(CheckName::ExtremeLanguage, Severity::High)]),
        ];
        let tally = CheckTally::from_audits(&audits);
        assert_eq!(tally.total_checks, 4);
        assert_eq!(tally.failed_checks, 2);
        assert_eq!(tally.status_counts[&OverallStatus::Clean], 1);
        assert_eq!(tally.status_counts[&OverallStatus::MinorIssues], 1);
        assert_eq!(tally.status_counts[&OverallStatus::MajorIssues], 1);
        assert!(!tally.status_counts.contains_key(&OverallStatus::Critical));
    }

    #[test]
    fn test_key_issues_ordering_and_limit() {
        let audits = vec![
            audit(
                "c1",
                vec![
                    failed(CheckName::SampleSizeDisclosure, Severity::Medium),
                    failed(CheckName::ExtremeLanguage, Severity::High),
                    passed(CheckName::BaseRateNeglect),
                ],
            ),
            audit(
                "c2",
                vec![
                    failed(CheckName::CorrelationVsCausation, Severity::High),
                    failed(CheckName::DataSupport, Severity::Low),
                    failed(CheckName::MissingComparator, Severity::Medium),
                ],
            ),
            audit(
                "c3",
                vec![failed(CheckName::RelativeRiskWithoutContext, Severity::Medium)],
            ),
        ];

        assert_eq!(
            key_issues(&audits),
            vec![
                "c1: Extreme Language (high)",
                "c2: Correlation vs Causation (high)",
                "c1: Sample Size Disclosure (medium)",
                "c2: Missing Comparator (medium)",
                "c3: Relative Risk Without Context (medium)",
            ]
        );
    }

    #[test]
    fn test_key_issues_empty_when_clean() {
        let audits = vec![audit("c1", vec![passed(CheckName::DataSupport)])];
        assert!(key_issues(&audits).is_empty());
    }
}
