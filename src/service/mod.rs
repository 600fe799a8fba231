pub mod audit;
pub mod checks;
pub mod extraction;
pub mod llm;
pub mod metrics;
pub mod narrative;
pub mod patterns;
pub mod prediction;
pub mod scoring;

pub use audit::{AuditError, AuditService};
pub use extraction::ClaimExtractionService;
pub use llm::{LlmClient, TextGenerator};
pub use narrative::NarrativeService;
