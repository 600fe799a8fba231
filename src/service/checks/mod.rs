//! Claim rule evaluator
//!
//! Runs the closed, ordered set of statistical rules against extracted claims.

use crate::model::{CheckName, Claim, ClaimAudit, StatisticalCheck};

pub mod rules;

/// A single statistical rule
pub type ClaimRule = fn(&Claim) -> StatisticalCheck;

/// All rules in output order
pub const RULES: [(CheckName, ClaimRule); 7] = [
    (CheckName::CorrelationVsCausation, rules::correlation_vs_causation),
    (CheckName::SampleSizeDisclosure, rules::sample_size_disclosure),
    (CheckName::ExtremeLanguage, rules::extreme_language),
    (CheckName::BaseRateNeglect, rules::base_rate_neglect),
    (CheckName::DataSupport, rules::data_support),
    (CheckName::RelativeRiskWithoutContext, rules::relative_risk_without_context),
    (CheckName::MissingComparator, rules::missing_comparator),
];

/// Run every rule against one claim, always returning seven checks in fixed order
pub fn run_all_checks(claim: &Claim) -> Vec<StatisticalCheck> {
    RULES.iter().map(|(_, rule)| rule(claim)).collect()
}

/// Build the audit for a single claim
pub fn audit_claim(claim: &Claim) -> ClaimAudit {
    let audit = ClaimAudit {
        claim_id: claim.claim_id.clone(),
        claim_quote: claim.quote.clone(),
        checks_performed: run_all_checks(claim),
    };

    tracing::debug!(
        claim_id = %audit.claim_id,
        failed = audit.failed_count(),
        status = ?audit.overall_status(),
        "Audited claim"
    );

    audit
}

/// Audit every claim, preserving claim order
pub fn audit_claims(claims: &[Claim]) -> Vec<ClaimAudit> {
    claims.iter().map(audit_claim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClaimType, OverallStatus, Severity};

    fn claim(id: &str, quote: &str) -> Claim {
        Claim {
            claim_id: id.to_string(),
            quote: quote.to_string(),
            claim_type: ClaimType::Causal,
            confidence: 0.8,
            variables: vec![],
            numerical_values: vec![],
        }
    }

    #[test]
    fn test_rule_table_matches_check_order() {
        let names: Vec<CheckName> = RULES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, CheckName::ALL.to_vec());
    }

    #[test]
    fn test_always_seven_checks_in_fixed_order() {
        let quotes = [
            "The sky is blue today",
            "AI always improves productivity by 300%",
            "Smokers are 3x more likely to develop cancer",
        ];
        for quote in quotes {
            let checks = run_all_checks(&claim("c1", quote));
            assert_eq!(checks.len(), 7);
            let names: Vec<CheckName> = checks.iter().map(|c| c.check_name).collect();
            assert_eq!(names, CheckName::ALL.to_vec());
        }
    }

    #[test]
    fn test_clean_claim() {
        let audit = audit_claim(&claim("c1", "The sky is blue today"));
        assert_eq!(audit.overall_status(), OverallStatus::Clean);
        assert!(audit.checks_performed.iter().all(|c| c.passed));
        assert!(
            audit
                .checks_performed
                .iter()
                .all(|c| c.severity == Severity::Low && c.explanation.len() >= 10)
        );
    }

    #[test]
    fn test_major_issues_from_high_severity_failure() {
        let audit = audit_claim(&claim("c2", "Coffee drinking causes longevity"));
        assert_eq!(audit.overall_status(), OverallStatus::MajorIssues);
        assert_eq!(audit.claim_id, "c2");
        assert_eq!(audit.claim_quote, "Coffee drinking causes longevity");
    }

    #[test]
    fn test_minor_issues_from_medium_failures_only() {
        let audit = audit_claim(&claim("c1", "Most people prefer tea"));
        assert!(audit.failed_count() > 0);
        assert!(audit.failed_checks().all(|c| c.severity == Severity::Medium));
        assert_eq!(audit.overall_status(), OverallStatus::MinorIssues);
    }

    #[test]
    fn test_audit_claims_preserves_order() {
        let claims = vec![
            claim("c1", "The sky is blue today"),
            claim("c2", "Coffee drinking causes longevity"),
            claim("c3", "Most people prefer tea"),
        ];
        let audits = audit_claims(&claims);
        let ids: Vec<&str> = audits.iter().map(|a| a.claim_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_multiple_failures_on_one_claim() {
        let audit = audit_claim(&claim("c1", "AI always improves productivity by 300%"));
        let failed: Vec<CheckName> = audit.failed_checks().map(|c| c.check_name).collect();
        assert!(failed.contains(&CheckName::CorrelationVsCausation));
        assert!(failed.contains(&CheckName::ExtremeLanguage));
        assert!(failed.contains(&CheckName::SampleSizeDisclosure));
        assert!(failed.contains(&CheckName::BaseRateNeglect));
    }
}
