pub mod audit;
pub mod claims;
pub mod config;
pub mod prediction;

pub use audit::{
    AuditReport, CheckName, ClaimAudit, ClaimAuditRecord, OverallStatus, Severity,
    StatisticalCheck, TextMetrics,
};
pub use claims::{Claim, ClaimType, ClaimsExtraction};
pub use config::{Config, GenerationConfig};
pub use prediction::{
    ClaimPredictionOutcome, IssueType, PredictionAccuracy, Predictions, TypeAccuracy,
};
