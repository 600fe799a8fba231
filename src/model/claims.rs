//! Claim models produced by the extraction step

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category tag assigned to an extracted claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Statistical,
    Causal,
    Comparative,
    Absolute,
}

/// A single assertion extracted from the analyzed text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct Claim {
    /// Sequential identifier: "c1", "c2", ...
    #[schemars(description = "Unique identifier for this claim (e.g. 'c1', 'c2')")]
    pub claim_id: String,
    /// Verbatim quote from the analyzed text
    #[schemars(description = "Exact quote from the original text")]
    pub quote: String,
    pub claim_type: ClaimType,
    /// Extractor confidence in [0, 1]
    pub confidence: f64,
    #[serde(default)]
    pub variables: Vec<String>,
    /// Literal numbers and percentages found in the quote
    #[serde(default)]
    pub numerical_values: Vec<String>,
}

/// Container returned by the extraction step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct ClaimsExtraction {
    pub claims: Vec<Claim>,
    /// Declared claim count, must equal `claims.len()`
    pub total_claims: i64,
}
