//! Predict-first mode: user-selected issue flags and accuracy against the audit

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::audit::CheckName;

/// Issue categories a user can flag before seeing the audit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Correlation,
    SampleSize,
    ExtremeLanguage,
    BaseRate,
    DataSupport,
    RelativeRisk,
    MissingComparator,
}

impl IssueType {
    pub const ALL: [IssueType; 7] = [
        IssueType::Correlation,
        IssueType::SampleSize,
        IssueType::ExtremeLanguage,
        IssueType::BaseRate,
        IssueType::DataSupport,
        IssueType::RelativeRisk,
        IssueType::MissingComparator,
    ];

    /// The check whose failure this flag predicts
    pub fn check_name(&self) -> CheckName {
        match self {
            IssueType::Correlation => CheckName::CorrelationVsCausation,
            IssueType::SampleSize => CheckName::SampleSizeDisclosure,
            IssueType::ExtremeLanguage => CheckName::ExtremeLanguage,
            IssueType::BaseRate => CheckName::BaseRateNeglect,
            IssueType::DataSupport => CheckName::DataSupport,
            IssueType::RelativeRisk => CheckName::RelativeRiskWithoutContext,
            IssueType::MissingComparator => CheckName::MissingComparator,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssueType::Correlation => "Correlation",
            IssueType::SampleSize => "Sample Size",
            IssueType::ExtremeLanguage => "Extreme Language",
            IssueType::BaseRate => "Base Rate",
            IssueType::DataSupport => "Data Support",
            IssueType::RelativeRisk => "Relative Risk",
            IssueType::MissingComparator => "Missing Comparator",
        }
    }
}

/// claim id -> issue flag -> flagged
pub type Predictions = HashMap<String, HashMap<IssueType, bool>>;

/// Comparison for a single reviewed claim
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClaimPredictionOutcome {
    pub quote: String,
    pub predicted: Vec<IssueType>,
    pub actual: Vec<IssueType>,
    pub caught: Vec<IssueType>,
    pub missed: Vec<IssueType>,
    pub false_positives: Vec<IssueType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct TypeAccuracy {
    pub caught: usize,
    pub total: usize,
}

/// Aggregate accuracy of the user's predictions
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PredictionAccuracy {
    /// true positives / total actual issues, 0 when there are none
    pub overall_accuracy: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub total_issues: usize,
    pub per_claim: BTreeMap<String, ClaimPredictionOutcome>,
    pub by_type: BTreeMap<IssueType, TypeAccuracy>,
    pub insights: Vec<String>,
}
