//! Trigger pattern library
//!
//! Named groups of case-insensitive trigger expressions. Each group answers a
//! single question: does this text contain any trigger from the group, and how
//! many times. Groups are compiled once on first use and never mutated.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

/// An ordered set of independently matchable patterns
#[derive(Debug)]
pub struct PatternGroup {
    name: &'static str,
    patterns: Vec<Regex>,
}

impl PatternGroup {
    /// Compile a group from literal patterns. All patterns are case-insensitive.
    ///
    /// Only called with the literals in this module, so an invalid pattern is a
    /// programming error caught by the tests below.
    fn new(name: &'static str, sources: &[&str]) -> Self {
        let patterns = sources
            .iter()
            .map(|src| {
                RegexBuilder::new(src)
                    .case_insensitive(true)
                    .build()
                    .unwrap_or_else(|e| panic!("invalid {name} pattern {src:?}: {e}"))
            })
            .collect();
        Self { name, patterns }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if any pattern of the group matches anywhere in `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Total non-overlapping matches of every pattern, not deduplicated across patterns
    pub fn count_matches(&self, text: &str) -> usize {
        self.patterns.iter().map(|p| p.find_iter(text).count()).sum()
    }

    /// First matched text of each pattern that matches, in pattern order
    pub fn first_matches<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.patterns
            .iter()
            .filter_map(|p| p.find(text).map(|m| m.as_str()))
            .collect()
    }
}

// Whole-text metric groups

const HEDGE_SOURCES: &[&str] = &[
    r"\bmight\b", r"\bmay\b", r"\bcould\b", r"\bpossibly\b", r"\bperhaps\b",
    r"\bprobably\b", r"\blikely\b", r"\bseems?\b", r"\bappears?\b", r"\bsuggests?\b",
    r"\btends?\b", r"\boften\b", r"\bsometimes\b", r"\bgenerally\b",
];

const EXTREME_SOURCES: &[&str] = &[
    r"\bprove[sd]?\b", r"\balways\b", r"\bnever\b", r"\bimpossible\b",
    r"\bcertainly\b", r"\bdefinitely\b", r"\bclearly\b", r"\bobviously\b",
    r"\bundoubtedly\b", r"\ball\b", r"\bnone\b", r"\bevery\b", r"\bno\b",
    r"\bcure[sd]?\b", r"\bwill\b", r"\bguarantee[sd]?\b", r"\bcertain\b",
    r"\bzero risk\b", r"\bmust\b", r"\bcan'?t\b", r"\bwon'?t\b",
    r"\beliminates?\b", r"\bensures?\b", r"\b100%\b", r"\bcompletely\b",
    r"\bentirely\b", r"\babsolutely\b", r"\btotally\b",
];

const CAUSAL_SOURCES: &[&str] = &[
    r"\bcauses?\b", r"\bcaused by\b", r"\bleads? to\b", r"\bresults? in\b",
    r"\bmakes?\b", r"\bforces?\b", r"\bproduces?\b", r"\bcreates?\b",
    r"\bdue to\b", r"\bbecause of\b", r"\btherefore\b", r"\bthus\b",
    r"\bincreases?\b", r"\bdecreases?\b", r"\bimproves?\b", r"\bworsens?\b",
    r"\bcures?\b", r"\bboosts?\b", r"\breduces?\b", r"\braises?\b",
    r"\blowers?\b", r"\benhances?\b", r"\bprevents?\b", r"\btriggers?\b",
    r"\benables?\b", r"\bdisables?\b",
];

const SAMPLE_SIZE_SOURCES: &[&str] = &[
    r"\bn\s*=\s*\d+", r"\bsample size[:\s]+\d+", r"\b\d+\s+participants?\b",
    r"\b\d+\s+subjects?\b", r"\b\d+\s+respondents?\b", r"\b\d+\s+people\b",
];

const NUMERIC_SOURCES: &[&str] = &[
    r"\b\d+\.?\d*%", r"\b\d+\.?\d*x\b", r"\b\d+\.?\d*\s*times\b",
    r"\b\d+\s*percent", r"\$\d+", r"\b\d+\.?\d*\s*(million|billion|thousand)\b",
];

// Claim-level groups

const RISK_MULTIPLIER_SOURCES: &[&str] = &[
    r"\bdoubl(e|es|ed|ing)\b", r"\btripl(e|es|ed|ing)\b",
    r"\b\d+x\s+(higher|more|greater|increased)",
    r"\b\d+\s+times\s+(higher|more|greater|as likely)",
    r"\b\d+%\s+increase", r"\b\d+00%\b",
];

const RISK_WORD_SOURCES: &[&str] = &[
    r"\brisk\b", r"\bchance\b", r"\blikely\b", r"\blikelihood\b",
    r"\bprobability\b", r"\bodds\b", r"\bmore likely\b", r"\bhazard\b",
];

const EFFECT_SOURCES: &[&str] = &[
    r"\bimproved?\b", r"\breduced?\b", r"\bincreased?\b", r"\bdecreased?\b",
    r"\bbetter\b", r"\bworse\b", r"\bmore effective\b", r"\bless effective\b",
    r"\bsuperior\b", r"\binferior\b", r"\benhanced?\b", r"\bworked\b",
    r"\bhelped\b", r"\bbenefited\b", r"\bboosted\b",
    // marketing and medical verbs
    r"\bregulates?\b", r"\bfights?\b", r"\bblocks?\b", r"\bstops?\b",
    r"\bprevents?\b", r"\bcures?\b",
];

const COMPARATOR_SOURCES: &[&str] = &[
    r"\bthan\b", r"\bvs\.?\b", r"\bversus\b", r"\bcompared to\b",
    r"\bcompared with\b", r"\brelative to\b", r"\bagainst\b",
    r"\bcontrol group\b", r"\bplacebo\b", r"\bbaseline\b",
    r"\bcontrol\b", r"\bcomparison group\b",
];

const EXPERIMENTAL_EVIDENCE_SOURCES: &[&str] = &[
    r"\brandomized\b", r"\bcontrolled trial\b", r"\bRCT\b", r"\bexperiment\b",
    r"\bintervention\b",
];

const HIGH_IMPACT_EXTREME_SOURCES: &[&str] = &[
    r"\bwill\b", r"\bcure[sd]?\b", r"\bguarantee[sd]?\b", r"\bmust\b",
];

const QUANTIFIED_RATE_SOURCES: &[&str] = &[
    r"\d+%", r"\d+\s*percent", r"\d+\.?\d*\s*times",
];

const PERCENTAGE_SOURCES: &[&str] = &[r"\d+%", r"\d+\s*percent"];

const RELATIVE_CHANGE_SOURCES: &[&str] = &[
    r"increase[sd]?", r"decrease[sd]?", r"more", r"less", r"higher", r"lower", r"times",
];

const MULTIPLIER_SOURCES: &[&str] = &[r"\d+x\b"];

const ABSOLUTE_DENOMINATOR_SOURCES: &[&str] = &[
    r"\bof\s+\d+", r"\bout of\s+\d+", r"from\s+\d+\s+to\s+\d+", r"n\s*=\s*\d+",
];

const ABSOLUTE_RISK_SOURCES: &[&str] = &[
    r"\bfrom\s+\d+\.?\d*%?\s+to\s+\d+\.?\d*%?", r"\bout of\s+\d+",
    r"\bof\s+\d+", r"\bin\s+\d+", r"\b\d+\.?\d*%\s+to\s+\d+\.?\d*%",
    r"\babsolute risk",
];

const IMPLICIT_COMPARATOR_SOURCES: &[&str] = &[
    r"\b(increase[ds]?|decrease[ds]?|reduced?|improved?|rose|fell|dropped|grew|enhanced?)\s+(by|from|to)\s+\d+",
    r"\bfrom\s+\d+.*?\bto\s+\d+",
];

const RESEARCH_CONTEXT_SOURCES: &[&str] = &[
    r"\bstudy\b", r"\bresearch\b", r"\btrial\b", r"\btest\b",
    r"\bparticipants?\b", r"\bsubjects?\b",
];

// Plain substrings: "most" also fires inside "almost"
const QUANTITATIVE_HEDGE_SOURCES: &[&str] = &[
    "significant", "substantial", "large", "small", "majority", "minority", "most",
    "few", "many", "rare", "common",
];

pub static HEDGE_WORDS: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("hedge", HEDGE_SOURCES));
pub static EXTREME_WORDS: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("extreme", EXTREME_SOURCES));
pub static CAUSAL_WORDS: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("causal", CAUSAL_SOURCES));
pub static SAMPLE_SIZE: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("sample_size", SAMPLE_SIZE_SOURCES));
pub static NUMERIC_MARKERS: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("numeric", NUMERIC_SOURCES));
pub static RISK_MULTIPLIERS: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("risk_multiplier", RISK_MULTIPLIER_SOURCES));
pub static RISK_WORDS: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("risk_word", RISK_WORD_SOURCES));
pub static EFFECT_WORDS: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("effect", EFFECT_SOURCES));
pub static COMPARATOR_WORDS: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("comparator", COMPARATOR_SOURCES));
pub static EXPERIMENTAL_EVIDENCE: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("experimental_evidence", EXPERIMENTAL_EVIDENCE_SOURCES));
pub static HIGH_IMPACT_EXTREME: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("high_impact_extreme", HIGH_IMPACT_EXTREME_SOURCES));
pub static QUANTIFIED_RATE: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("quantified_rate", QUANTIFIED_RATE_SOURCES));
pub static PERCENTAGE: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("percentage", PERCENTAGE_SOURCES));
pub static RELATIVE_CHANGE: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("relative_change", RELATIVE_CHANGE_SOURCES));
pub static MULTIPLIER: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("multiplier", MULTIPLIER_SOURCES));
pub static ABSOLUTE_DENOMINATOR: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("absolute_denominator", ABSOLUTE_DENOMINATOR_SOURCES));
pub static ABSOLUTE_RISK_CONTEXT: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("absolute_risk_context", ABSOLUTE_RISK_SOURCES));
pub static IMPLICIT_COMPARATOR: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("implicit_comparator", IMPLICIT_COMPARATOR_SOURCES));
pub static RESEARCH_CONTEXT: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("research_context", RESEARCH_CONTEXT_SOURCES));
pub static QUANTITATIVE_HEDGE: LazyLock<PatternGroup> =
    LazyLock::new(|| PatternGroup::new("quantitative_hedge", QUANTITATIVE_HEDGE_SOURCES));

/// Every group, for start-up warm-up and validation
pub fn all_groups() -> [&'static PatternGroup; 20] {
    [
        &HEDGE_WORDS,
        &EXTREME_WORDS,
        &CAUSAL_WORDS,
        &SAMPLE_SIZE,
        &NUMERIC_MARKERS,
        &RISK_MULTIPLIERS,
        &RISK_WORDS,
        &EFFECT_WORDS,
        &COMPARATOR_WORDS,
        &EXPERIMENTAL_EVIDENCE,
        &HIGH_IMPACT_EXTREME,
        &QUANTIFIED_RATE,
        &PERCENTAGE,
        &RELATIVE_CHANGE,
        &MULTIPLIER,
        &ABSOLUTE_DENOMINATOR,
        &ABSOLUTE_RISK_CONTEXT,
        &IMPLICIT_COMPARATOR,
        &RESEARCH_CONTEXT,
        &QUANTITATIVE_HEDGE,
    ]
}

/// Force compilation of every group so a bad literal fails at start-up, not mid-request
pub fn warm_up() -> usize {
    all_groups()
        .iter()
        .map(|group| {
            if group.is_empty() {
                warn!(group = group.name(), "pattern group has no patterns");
            }
            debug!(group = group.name(), patterns = group.len(), "compiled pattern group");
            group.len()
        })
        .sum()
}
