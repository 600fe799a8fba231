//! Prompts for the audit summary and counterfactual alternatives

use crate::model::{ClaimAudit, TextMetrics};

/// Angle the counterfactual prompt asks the generator to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterfactualFocus {
    Causation,
    SampleSize,
    Absolute,
    BaseRate,
    General,
}

impl CounterfactualFocus {
    /// Pick the focus from a check name such as "Correlation vs Causation"
    pub fn for_check(check_name: &str) -> Self {
        let name = check_name.to_lowercase();
        if name.contains("correlation") || name.contains("causation") {
            CounterfactualFocus::Causation
        } else if name.contains("sample") {
            CounterfactualFocus::SampleSize
        } else if name.contains("extreme") || name.contains("absolute") {
            CounterfactualFocus::Absolute
        } else if name.contains("base rate") {
            CounterfactualFocus::BaseRate
        } else {
            CounterfactualFocus::General
        }
    }

    fn guidance(&self) -> &'static str {
        match self {
            CounterfactualFocus::Causation => {
                "Think like a skeptical scientist. What are alternative explanations for this correlation?
Consider:
- Confounding variables (what else might cause both?)
- Reverse causation (does B actually cause A instead?)
- Selection bias (who was studied?)
- Spurious correlation (coincidence?)"
            }
            CounterfactualFocus::SampleSize => {
                "Think about sample size issues. What could go wrong with small or biased samples?
Consider:
- Statistical noise and random variation
- Non-representative samples
- Cherry-picked data
- Publication bias"
            }
            CounterfactualFocus::Absolute => {
                "Think about exceptions and edge cases. Why is absolute language problematic?
Consider:
- Edge cases and exceptions
- Context-dependent situations
- Individual variation
- Time-dependent factors"
            }
            CounterfactualFocus::BaseRate => {
                "Think about missing context. What information would change the interpretation?
Consider:
- Absolute numbers vs percentages
- Starting baseline
- Comparison groups
- Historical context"
            }
            CounterfactualFocus::General => {
                "Think critically about what might be wrong or missing in this reasoning.
Consider alternative explanations, missing information, and potential biases."
            }
        }
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// One block per claim: id, quote, status, failed count and explanations
fn format_audits(audits: &[ClaimAudit]) -> String {
    audits
        .iter()
        .map(|audit| {
            let details: Vec<&str> = audit
                .failed_checks()
                .map(|c| c.explanation.as_str())
                .collect();
            format!(
                "Claim {}: \"{}\"\nStatus: {}\nIssues found: {}\nDetails: {}",
                audit.claim_id,
                audit.claim_quote,
                audit.overall_status().as_str(),
                details.len(),
                details.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_summary_prompt(text: &str, metrics: &TextMetrics, audits: &[ClaimAudit]) -> String {
    format!(
        r#"You are a statistical reasoning educator. Your job is to explain audit findings in a clear, educational way.

ORIGINAL TEXT:
{text}

QUANTITATIVE ANALYSIS:
- Data density: {density} of sentences contain numbers/statistics
- Vagueness score: {vagueness} (higher = more hedge words)
- Extreme language: {extreme} instances of absolute terms
- Sample size mentioned: {sample}
- Causation language: {causal} instances without evidence

CLAIM-BY-CLAIM AUDIT RESULTS:
{audits}

Write a clear, educational summary (200-300 words) that:

1. Starts with an overall assessment (is this text data-driven or hand-wavy?)
2. Highlights the 2-3 most important issues found
3. Explains why each issue is problematic
4. Keeps a balanced, informative tone

Write the summary now:"#,
        density = percent(metrics.data_density_score),
        vagueness = percent(metrics.vagueness_score),
        extreme = metrics.extreme_language_count,
        sample = metrics.sample_size_mentioned,
        causal = metrics.causation_language_count,
        audits = format_audits(audits),
    )
}

pub fn build_counterfactual_prompt(claim_quote: &str, check_name: &str, explanation: &str) -> String {
    format!(
        r#"You are teaching critical thinking. A claim has a logical issue.

Claim: "{claim_quote}"

Issue: {check_name}
Why it's problematic: {explanation}

{focus}

Generate 3-4 concise alternative explanations (each 1-2 sentences). Format as a numbered list:

1. [First alternative explanation]
2. [Second alternative explanation]
3. [Third alternative explanation]
4. [Fourth alternative explanation]

Be specific and educational."#,
        focus = CounterfactualFocus::for_check(check_name).guidance(),
    )
}
