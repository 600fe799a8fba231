//! Audit result models: per-check verdicts, per-claim audits and the final report

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ordinal issue weight. `Critical` is reserved and not emitted by the current rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// The seven fixed statistical checks, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CheckName {
    #[serde(rename = "Correlation vs Causation")]
    CorrelationVsCausation,
    #[serde(rename = "Sample Size Disclosure")]
    SampleSizeDisclosure,
    #[serde(rename = "Extreme Language")]
    ExtremeLanguage,
    #[serde(rename = "Base Rate Neglect")]
    BaseRateNeglect,
    #[serde(rename = "Data Support")]
    DataSupport,
    #[serde(rename = "Relative Risk Without Context")]
    RelativeRiskWithoutContext,
    #[serde(rename = "Missing Comparator")]
    MissingComparator,
}

impl CheckName {
    #[cfg(test)]
    pub const ALL: [CheckName; 7] = [
        CheckName::CorrelationVsCausation,
        CheckName::SampleSizeDisclosure,
        CheckName::ExtremeLanguage,
        CheckName::BaseRateNeglect,
        CheckName::DataSupport,
        CheckName::RelativeRiskWithoutContext,
        CheckName::MissingComparator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckName::CorrelationVsCausation => "Correlation vs Causation",
            CheckName::SampleSizeDisclosure => "Sample Size Disclosure",
            CheckName::ExtremeLanguage => "Extreme Language",
            CheckName::BaseRateNeglect => "Base Rate Neglect",
            CheckName::DataSupport => "Data Support",
            CheckName::RelativeRiskWithoutContext => "Relative Risk Without Context",
            CheckName::MissingComparator => "Missing Comparator",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of one rule applied to one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatisticalCheck {
    pub check_name: CheckName,
    pub passed: bool,
    pub severity: Severity,
    pub explanation: String,
    /// How to fix the issue, present on failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl StatisticalCheck {
    /// A passing, low-severity verdict. Covers both "not applicable" and "satisfied".
    pub fn pass(check_name: CheckName, explanation: impl Into<String>) -> Self {
        Self {
            check_name,
            passed: true,
            severity: Severity::Low,
            explanation: explanation.into(),
            suggestion: None,
        }
    }

    pub fn fail(
        check_name: CheckName,
        severity: Severity,
        explanation: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            check_name,
            passed: false,
            severity,
            explanation: explanation.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

/// Overall status of a claim, derived from its checks
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Clean,
    MinorIssues,
    MajorIssues,
    Critical,
}

impl OverallStatus {
    /// critical > high > any failure > clean
    pub fn from_checks(checks: &[StatisticalCheck]) -> Self {
        let mut failed = checks.iter().filter(|c| !c.passed).peekable();
        if failed.peek().is_none() {
            return OverallStatus::Clean;
        }
        match failed.map(|c| c.severity).max() {
            Some(Severity::Critical) => OverallStatus::Critical,
            Some(Severity::High) => OverallStatus::MajorIssues,
            _ => OverallStatus::MinorIssues,
        }
    }

    /// Wire name, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Clean => "clean",
            OverallStatus::MinorIssues => "minor_issues",
            OverallStatus::MajorIssues => "major_issues",
            OverallStatus::Critical => "critical",
        }
    }
}

/// Full rule outcome for one claim.
///
/// The overall status is never stored; it is recomputed from `checks_performed`
/// and only materialised when serialising.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ClaimAuditRecord")]
pub struct ClaimAudit {
    pub claim_id: String,
    pub claim_quote: String,
    pub checks_performed: Vec<StatisticalCheck>,
}

impl ClaimAudit {
    pub fn overall_status(&self) -> OverallStatus {
        OverallStatus::from_checks(&self.checks_performed)
    }

    pub fn failed_checks(&self) -> impl Iterator<Item = &StatisticalCheck> {
        self.checks_performed.iter().filter(|c| !c.passed)
    }

    pub fn failed_count(&self) -> usize {
        self.failed_checks().count()
    }
}

/// Serialised form of a [`ClaimAudit`], carrying the derived status
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClaimAuditRecord {
    pub claim_id: String,
    pub claim_quote: String,
    pub checks_performed: Vec<StatisticalCheck>,
    pub overall_status: OverallStatus,
}

impl From<ClaimAudit> for ClaimAuditRecord {
    fn from(audit: ClaimAudit) -> Self {
        let overall_status = audit.overall_status();
        Self {
            claim_id: audit.claim_id,
            claim_quote: audit.claim_quote,
            checks_performed: audit.checks_performed,
            overall_status,
        }
    }
}

/// Whole-text quantitative scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TextMetrics {
    /// Share of sentences containing a numeric marker, in [0, 1]
    pub data_density_score: f64,
    /// Scaled hedge-word density, in [0, 1]
    pub vagueness_score: f64,
    pub extreme_language_count: usize,
    pub sample_size_mentioned: bool,
    pub causation_language_count: usize,
}

/// Final audit report
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditReport {
    pub text_metrics: TextMetrics,
    #[schema(value_type = Vec<ClaimAuditRecord>)]
    pub claim_audits: Vec<ClaimAudit>,
    /// Heuristic reliability score in [0, 100]
    pub overall_reliability_score: f64,
    pub summary: String,
    pub key_issues: Vec<String>,
    pub total_checks: usize,
    pub failed_checks: usize,
    /// Number of claims per overall status
    #[schema(value_type = Object)]
    pub status_counts: BTreeMap<OverallStatus, usize>,
    /// Input-size guidance for the caller (very short or very long text)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}
