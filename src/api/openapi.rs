//! OpenAPI specification endpoints

use actix_web::{HttpResponse, get};
use utoipa::OpenApi;

use crate::api::error::{ApiError, ErrorResponse};
use crate::api::{audit, health};
use crate::model;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nuance Audit API",
        description = "Audits prose for statistical and rhetorical weaknesses"
    ),
    paths(
        audit::audit_text,
        audit::extract_claims,
        audit::compare_predictions,
        audit::counterfactuals,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        audit::AuditRequest,
        audit::ClaimsResponse,
        audit::CompareRequest,
        audit::CompareResponse,
        audit::CounterfactualRequest,
        audit::CounterfactualResponse,
        model::AuditReport,
        model::ClaimAuditRecord,
        model::StatisticalCheck,
        model::CheckName,
        model::Severity,
        model::OverallStatus,
        model::TextMetrics,
        model::Claim,
        model::ClaimType,
        model::ClaimsExtraction,
        model::IssueType,
        model::PredictionAccuracy,
        model::ClaimPredictionOutcome,
        model::TypeAccuracy,
        health::HealthStatus,
        health::ReadinessStatus,
        ErrorResponse,
    )),
    tags(
        (name = "audit", description = "Claim extraction and statistical auditing"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> Result<HttpResponse, ApiError> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(|e| ApiError::Internal(format!("Failed to render OpenAPI YAML: {e}")))?;
    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
