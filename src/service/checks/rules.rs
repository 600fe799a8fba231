//! The seven statistical rules
//!
//! Each rule is a pure function of one claim. A rule whose trigger is absent
//! returns the same passing, low-severity verdict as a rule that is satisfied.

use crate::model::{CheckName, Claim, Severity, StatisticalCheck};
use crate::service::patterns::{
    ABSOLUTE_DENOMINATOR, ABSOLUTE_RISK_CONTEXT, CAUSAL_WORDS, COMPARATOR_WORDS, EFFECT_WORDS,
    EXPERIMENTAL_EVIDENCE, EXTREME_WORDS, HIGH_IMPACT_EXTREME, IMPLICIT_COMPARATOR, MULTIPLIER,
    PERCENTAGE, QUANTIFIED_RATE, QUANTITATIVE_HEDGE, RELATIVE_CHANGE, RESEARCH_CONTEXT,
    RISK_MULTIPLIERS, RISK_WORDS, SAMPLE_SIZE,
};

/// Matched extreme terms quoted back in the explanation
const MAX_QUOTED_TERMS: usize = 3;

/// Causal wording without an experimental-evidence marker
pub fn correlation_vs_causation(claim: &Claim) -> StatisticalCheck {
    let name = CheckName::CorrelationVsCausation;

    if CAUSAL_WORDS.is_match(&claim.quote) && !EXPERIMENTAL_EVIDENCE.is_match(&claim.quote) {
        return StatisticalCheck::fail(
            name,
            Severity::High,
            format!(
                "Claim uses causal language ('{}') without citing experimental evidence. \
                 Establishing cause needs a randomized controlled trial or careful causal \
                 inference; an observed correlation is not enough.",
                claim.quote
            ),
            "Cite the experimental evidence, or rephrase with correlational wording such as \
             'associated with', 'correlated with' or 'linked to'",
        );
    }

    StatisticalCheck::pass(name, "No unsupported causal language detected.")
}

/// Numbers quoted without the size of the sample behind them
pub fn sample_size_disclosure(claim: &Claim) -> StatisticalCheck {
    let name = CheckName::SampleSizeDisclosure;
    let applicable = QUANTIFIED_RATE.is_match(&claim.quote) || !claim.numerical_values.is_empty();

    if applicable && !SAMPLE_SIZE.is_match(&claim.quote) {
        return StatisticalCheck::fail(
            name,
            Severity::Medium,
            format!(
                "Statistical claim '{}' reports numbers but not the sample size. \
                 Small samples can produce misleading statistics.",
                claim.quote
            ),
            "State the sample size, e.g. 'n=X' or 'based on X participants'",
        );
    }

    StatisticalCheck::pass(
        name,
        "Sample size disclosed or not required for this claim.",
    )
}

/// Absolute or certainty wording
pub fn extreme_language(claim: &Claim) -> StatisticalCheck {
    let name = CheckName::ExtremeLanguage;
    let matched = EXTREME_WORDS.first_matches(&claim.quote);

    if matched.is_empty() {
        return StatisticalCheck::pass(name, "No absolute language detected.");
    }

    let severity = if HIGH_IMPACT_EXTREME.is_match(&claim.quote) {
        Severity::High
    } else {
        Severity::Medium
    };

    let terms: Vec<String> = matched
        .iter()
        .take(MAX_QUOTED_TERMS)
        .map(|m| m.to_lowercase())
        .collect();

    StatisticalCheck::fail(
        name,
        severity,
        format!(
            "Claim uses absolute language: '{}'. Terms such as 'always', 'never', 'will', \
             'cure' or 'guarantee' are rarely justified by evidence.",
            terms.join(", ")
        ),
        "Use qualified wording: 'often', 'may', 'suggests', 'can help', 'associated with'",
    )
}

/// Relative figures without an absolute denominator
pub fn base_rate_neglect(claim: &Claim) -> StatisticalCheck {
    let name = CheckName::BaseRateNeglect;
    let quote = &claim.quote;
    let applicable =
        PERCENTAGE.is_match(quote) || RELATIVE_CHANGE.is_match(quote) || MULTIPLIER.is_match(quote);

    if applicable && !ABSOLUTE_DENOMINATOR.is_match(quote) {
        return StatisticalCheck::fail(
            name,
            Severity::Medium,
            "Claim gives relative figures without absolute context. A '50% increase' \
             means something very different starting from 2 than from 2000.",
            "Add the absolute numbers, e.g. '50% increase (from 100 to 150)', or the baseline",
        );
    }

    StatisticalCheck::pass(name, "Base rate provided or not applicable.")
}

/// Quantitative wording with no numbers behind it.
///
/// Keyed off the structured `numerical_values` list rather than the quote.
pub fn data_support(claim: &Claim) -> StatisticalCheck {
    let name = CheckName::DataSupport;

    if QUANTITATIVE_HEDGE.is_match(&claim.quote) && claim.numerical_values.is_empty() {
        return StatisticalCheck::fail(
            name,
            Severity::Medium,
            format!(
                "Claim uses quantitative language ('{}') but gives no numbers. \
                 Words like 'significant' or 'most' should be backed by data.",
                claim.quote
            ),
            "Replace vague quantities with specific percentages or counts",
        );
    }

    StatisticalCheck::pass(
        name,
        "Quantities are backed by numbers or none are implied.",
    )
}

/// Risk multipliers ("doubles your risk") without absolute risk.
///
/// Requires both a multiplier and a risk word so that plain percentages are
/// left to the base-rate rule.
pub fn relative_risk_without_context(claim: &Claim) -> StatisticalCheck {
    let name = CheckName::RelativeRiskWithoutContext;
    let quote = &claim.quote;

    if RISK_MULTIPLIERS.is_match(quote)
        && RISK_WORDS.is_match(quote)
        && !ABSOLUTE_RISK_CONTEXT.is_match(quote)
    {
        return StatisticalCheck::fail(
            name,
            Severity::High,
            format!(
                "Claim uses alarming relative risk language ('{}') without absolute numbers. \
                 Doubling a risk from 0.001% to 0.002% is very different from 10% to 20%.",
                claim.quote
            ),
            "Give the absolute risk: 'increased from 0.5% to 1%' or 'affects 2 in 10,000 \
             people instead of 1 in 10,000'",
        );
    }

    StatisticalCheck::pass(
        name,
        "Relative risk put in absolute context or not applicable.",
    )
}

/// Effect claims that never say what they are measured against
pub fn missing_comparator(claim: &Claim) -> StatisticalCheck {
    let name = CheckName::MissingComparator;
    let quote = &claim.quote;

    if !EFFECT_WORDS.is_match(quote)
        || COMPARATOR_WORDS.is_match(quote)
        || IMPLICIT_COMPARATOR.is_match(quote)
    {
        return StatisticalCheck::pass(
            name,
            "Comparison point stated or not required.",
        );
    }

    // Research claims are held to a stricter standard than marketing copy
    let severity = if RESEARCH_CONTEXT.is_match(quote) {
        Severity::High
    } else {
        Severity::Medium
    };

    StatisticalCheck::fail(
        name,
        severity,
        format!(
            "Claim reports an effect ('{}') without saying what it is compared to: placebo, \
             a control group, a previous version, or doing nothing. Without a reference \
             point the effect cannot be judged.",
            claim.quote
        ),
        "Name the comparison: 'improved compared to placebo', 'better than standard \
         treatment', 'reduced vs. baseline'",
    )
}
