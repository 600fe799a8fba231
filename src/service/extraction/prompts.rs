//! Prompts for claim extraction and retry feedback

use std::sync::LazyLock;

use crate::model::ClaimsExtraction;
use crate::service::extraction::ClaimExtractionError;

/// JSON schema of the extraction shape, rendered once
static CLAIMS_SCHEMA: LazyLock<String> = LazyLock::new(|| {
    let schema = schemars::schema_for!(ClaimsExtraction);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
});

/// Build the initial extraction prompt for a text
pub fn build_extraction_prompt(text: &str) -> String {
    format!(
        r#"You are a statistical reasoning auditor. Your job is to extract concrete, testable claims from text.

Analyze this text and extract ALL statistical, causal, comparative, or absolute claims:

<text>
{text}
</text>

For each claim, identify:
1. The exact quote from the text
2. The type of claim (statistical/causal/comparative/absolute)
3. Any variables or factors mentioned
4. Any numerical values, percentages, or statistics

Rules:
- Extract only claims that make factual assertions, not opinions
- Quote the original text exactly
- Assign sequential IDs: c1, c2, c3, ...
- Be thorough but precise

Output JSON matching this shape:

{{
    "claims": [
        {{
            "claim_id": "c1",
            "quote": "exact quote from text",
            "claim_type": "statistical" | "causal" | "comparative" | "absolute",
            "confidence": 0.0 to 1.0,
            "variables": ["variable1", "variable2"],
            "numerical_values": ["50%", "1000", "3x"]
        }}
    ],
    "total_claims": number_of_claims
}}

Output ONLY the JSON, with no additional text."#
    )
}

/// Build the correction message sent after a malformed response
pub fn build_feedback_prompt(error: &ClaimExtractionError) -> String {
    format!(
        r#"{kind} error occurred. Please fix the JSON and try again.

Error details:
{error}

Requirements:
1. Your response must be valid JSON
2. It must match this schema exactly:
{schema}
3. All required fields must be present
4. All field types must be correct (strings, numbers, arrays)
5. Numeric fields must be in range (confidence between 0 and 1, total_claims equal to the number of claims)

Output ONLY the corrected JSON, with no additional text."#,
        kind = error.kind(),
        schema = CLAIMS_SCHEMA.as_str(),
    )
}
