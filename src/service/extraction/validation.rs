//! Schema gate for generated claim extractions
//!
//! Parses the raw generator payload and checks the extraction invariants.
//! Violations are errors and send the loop back to the generator; grounding
//! and ordering problems are only warnings.

use std::collections::HashSet;

use crate::model::ClaimsExtraction;
use crate::service::extraction::ClaimExtractionError;

/// Minimum quote length, in characters
pub const MIN_QUOTE_CHARS: usize = 5;

/// Result of extraction validation
#[derive(Debug)]
pub struct ClaimValidationResult {
    /// Whether the extraction satisfies every invariant
    pub is_valid: bool,
    /// Invariant violations
    pub errors: Vec<String>,
    /// Quality issues that do not reject the extraction
    pub warnings: Vec<String>,
}

impl ClaimValidationResult {
    /// Create a new validation result with no issues
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to the validation result
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the validation result
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Convert into a `Result`, logging warnings
    pub fn into_result(self) -> Result<(), ClaimExtractionError> {
        if !self.warnings.is_empty() {
            tracing::warn!(
                warnings = ?self.warnings,
                "Claim extraction produced quality warnings"
            );
        }
        if self.is_valid {
            Ok(())
        } else {
            Err(ClaimExtractionError::Validation(self.errors))
        }
    }
}

/// Strip a fenced code block if present, otherwise return the trimmed payload.
///
/// A ```` ```json ```` fence wins over a bare fence; an unterminated fence runs
/// to the end of the response.
pub fn strip_code_fence(response: &str) -> &str {
    let response = response.trim();

    let start = if let Some(pos) = response.find("```json") {
        pos + "```json".len()
    } else if let Some(pos) = response.find("```") {
        pos + "```".len()
    } else {
        return response;
    };

    let rest = &response[start..];
    let end = rest.find("```").unwrap_or(rest.len());
    rest[..end].trim()
}

/// Parse a raw generator response into the extraction shape
pub fn parse_extraction(response: &str) -> Result<ClaimsExtraction, ClaimExtractionError> {
    let payload = strip_code_fence(response);
    serde_json::from_str(payload).map_err(|e| ClaimExtractionError::Parse(e.to_string()))
}

/// Parse and validate in one step
pub fn parse_and_validate(
    response: &str,
    source_text: &str,
) -> Result<ClaimsExtraction, ClaimExtractionError> {
    let extraction = parse_extraction(response)?;
    validate_extraction(&extraction, source_text).into_result()?;
    Ok(extraction)
}

/// Check the extraction invariants
///
/// Errors:
/// 1. At least one claim
/// 2. Declared count equals the number of claims
/// 3. Ids are `c` followed by a positive integer, and unique
/// 4. Quotes have at least [`MIN_QUOTE_CHARS`] characters
/// 5. Confidence is a finite number in [0, 1]
///
/// Warnings: ids out of sequence, quote not found in the source text.
pub fn validate_extraction(
    extraction: &ClaimsExtraction,
    source_text: &str,
) -> ClaimValidationResult {
    let mut result = ClaimValidationResult::valid();

    if extraction.claims.is_empty() {
        result.add_error("claims must contain at least one claim".to_string());
    }

    if extraction.total_claims < 1 {
        result.add_error(format!(
            "total_claims ({}) must be at least 1",
            extraction.total_claims
        ));
    } else if extraction.total_claims as usize != extraction.claims.len() {
        result.add_error(format!(
            "total_claims ({}) must match actual claims count ({})",
            extraction.total_claims,
            extraction.claims.len()
        ));
    }

    let normalized_source = normalize_for_search(source_text);
    let mut seen_ids = HashSet::new();

    for (i, claim) in extraction.claims.iter().enumerate() {
        let position = i + 1;

        match parse_claim_number(&claim.claim_id) {
            Some(n) => {
                if n != position as u64 {
                    result.add_warning(format!(
                        "Claim {} has out-of-sequence id '{}' (expected 'c{}')",
                        position, claim.claim_id, position
                    ));
                }
            }
            None => result.add_error(format!(
                "Claim {} claim_id '{}' must follow format 'c1', 'c2', etc.",
                position, claim.claim_id
            )),
        }

        if !seen_ids.insert(claim.claim_id.as_str()) {
            result.add_error(format!(
                "Claim {} reuses claim_id '{}'",
                position, claim.claim_id
            ));
        }

        let quote = claim.quote.trim();
        if quote.chars().count() < MIN_QUOTE_CHARS {
            result.add_error(format!(
                "Claim {} quote must be at least {} characters: '{}'",
                position, MIN_QUOTE_CHARS, claim.quote
            ));
        } else if !normalized_source.contains(&normalize_for_search(quote)) {
            result.add_warning(format!(
                "Claim {} quote not found in text: '{}'",
                position,
                quote.chars().take(100).collect::<String>()
            ));
        }

        if !claim.confidence.is_finite() || !(0.0..=1.0).contains(&claim.confidence) {
            result.add_error(format!(
                "Claim {} confidence ({}) must be between 0 and 1",
                position, claim.confidence
            ));
        }
    }

    result
}

/// `c<positive integer>` -> the integer
fn parse_claim_number(claim_id: &str) -> Option<u64> {
    let digits = claim_id.strip_prefix('c')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n > 0)
}

/// Collapse whitespace and lowercase for substring comparison
fn normalize_for_search(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
