//! Whole-text metrics
//!
//! Pure functions of the input text: no state is shared between calls, so the
//! five scores can be computed concurrently for independent requests.

use crate::model::TextMetrics;
use crate::service::patterns::{
    CAUSAL_WORDS, EXTREME_WORDS, HEDGE_WORDS, NUMERIC_MARKERS, SAMPLE_SIZE,
};

/// Hedge density at which the vagueness score saturates (10% of words)
const VAGUENESS_SCALE: f64 = 10.0;

/// Compute all text-level metrics
pub fn calculate_text_metrics(text: &str) -> TextMetrics {
    let sentences = split_sentences(text);

    let metrics = TextMetrics {
        data_density_score: data_density(&sentences),
        vagueness_score: vagueness_score(text),
        extreme_language_count: extreme_language_count(text),
        sample_size_mentioned: sample_size_mentioned(text),
        causation_language_count: causation_language_count(text),
    };

    tracing::debug!(
        sentences = sentences.len(),
        data_density = metrics.data_density_score,
        vagueness = metrics.vagueness_score,
        extreme_count = metrics.extreme_language_count,
        sample_size = metrics.sample_size_mentioned,
        causation_count = metrics.causation_language_count,
        "Computed text metrics"
    );

    metrics
}

/// Split on terminal punctuation, dropping empty fragments
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Share of sentences containing at least one numeric marker
fn data_density(sentences: &[&str]) -> f64 {
    if sentences.is_empty() {
        return 0.0;
    }

    let with_numbers = sentences
        .iter()
        .filter(|s| NUMERIC_MARKERS.is_match(s))
        .count();

    with_numbers as f64 / sentences.len() as f64
}

fn vagueness_score(text: &str) -> f64 {
    let total_words = text.split_whitespace().count();
    if total_words == 0 {
        return 0.0;
    }

    let hedges = HEDGE_WORDS.count_matches(text);
    (hedges as f64 / total_words as f64 * VAGUENESS_SCALE).min(1.0)
}

fn extreme_language_count(text: &str) -> usize {
    EXTREME_WORDS.count_matches(text)
}

fn sample_size_mentioned(text: &str) -> bool {
    SAMPLE_SIZE.is_match(text)
}

fn causation_language_count(text: &str) -> usize {
    CAUSAL_WORDS.count_matches(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let metrics = calculate_text_metrics("");
        assert_eq!(metrics.data_density_score, 0.0);
        assert_eq!(metrics.vagueness_score, 0.0);
        assert_eq!(metrics.extreme_language_count, 0);
        assert!(!metrics.sample_size_mentioned);
        assert_eq!(metrics.causation_language_count, 0);
    }

    #[test]
    fn test_punctuation_only_text() {
        let metrics = calculate_text_metrics("... !!! ???");
        assert_eq!(metrics.data_density_score, 0.0);
        assert!(split_sentences("... !!! ???").is_empty());
    }

    #[test]
    fn test_split_sentences_discards_empty_fragments() {
        let sentences = split_sentences("First one. Second one!! Third?  ");
        assert_eq!(sentences, vec!["First one", "Second one", "Third"]);
    }

    #[test]
    fn test_data_density() {
        let text = "Sales rose 40% last year. The team was happy. Costs hit $500.";
        let metrics = calculate_text_metrics(text);
        assert!((metrics.data_density_score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_vagueness_saturates_at_one() {
        let metrics = calculate_text_metrics("might may could perhaps");
        assert_eq!(metrics.vagueness_score, 1.0);
    }

    #[test]
    fn test_vagueness_scaled_by_ten() {
        // 1 hedge word out of 20 words: 0.05 * 10 = 0.5
        let text = "This result might hold for the group we looked at in the spring and summer of the year we ran";
        assert_eq!(text.split_whitespace().count(), 20);
        let metrics = calculate_text_metrics(text);
        assert!((metrics.vagueness_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_and_causal_counts() {
        let text = "Coffee always causes longevity. It will never fail and always works.";
        let metrics = calculate_text_metrics(text);
        // always x2, will, never
        assert_eq!(metrics.extreme_language_count, 4);
        assert_eq!(metrics.causation_language_count, 1);
    }

    #[test]
    fn test_sample_size_anywhere_in_text() {
        let text = "We surveyed 1200 respondents. Most liked it.";
        assert!(calculate_text_metrics(text).sample_size_mentioned);
        assert!(!calculate_text_metrics("Most people liked it.").sample_size_mentioned);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let samples = [
            "",
            "maybe",
            "might might might might might",
            "1% 2% 3%. 4x. $5. 6 million.",
            "It seems likely. It appears so. Perhaps, possibly, probably.",
        ];
        for text in samples {
            let metrics = calculate_text_metrics(text);
            assert!((0.0..=1.0).contains(&metrics.data_density_score), "{text}");
            assert!((0.0..=1.0).contains(&metrics.vagueness_score), "{text}");
        }
    }
}
