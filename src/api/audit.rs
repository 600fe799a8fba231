//! REST API endpoints for auditing text

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{AuditReport, ClaimsExtraction, PredictionAccuracy, Predictions};
use crate::service::AuditService;

/// Text to analyze
#[derive(Debug, Deserialize, ToSchema)]
pub struct AuditRequest {
    pub text: String,
}

/// Validated claims from `POST /v1/claims`
///
/// Serializes as the extraction itself plus optional input-size notices, so the
/// body can be sent back unchanged as `CompareRequest::extraction`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClaimsResponse {
    #[serde(flatten)]
    pub extraction: ClaimsExtraction,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

/// Predict-first comparison input
///
/// `extraction` is the result of `POST /v1/claims` for the same text, so the
/// prediction keys line up with its claim ids.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CompareRequest {
    pub text: String,
    pub extraction: ClaimsExtraction,
    /// claim id -> issue type -> flagged
    #[schema(value_type = Object)]
    pub predictions: Predictions,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompareResponse {
    pub report: AuditReport,
    pub accuracy: PredictionAccuracy,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CounterfactualRequest {
    pub claim_quote: String,
    /// Failed check, e.g. "Correlation vs Causation"
    pub check_name: String,
    pub explanation: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CounterfactualResponse {
    pub alternatives: Vec<String>,
}

/// Audit a text end to end
#[utoipa::path(
    post,
    path = "/v1/audit",
    request_body = AuditRequest,
    responses(
        (status = 200, description = "Audit report", body = AuditReport),
        (status = 400, description = "Empty text", body = ErrorResponse),
        (status = 422, description = "No valid claims could be extracted", body = ErrorResponse),
        (status = 502, description = "Generation service error", body = ErrorResponse),
        (status = 504, description = "Generation service timed out", body = ErrorResponse)
    ),
    tag = "audit"
)]
#[post("/v1/audit")]
pub async fn audit_text(
    service: web::Data<AuditService>,
    request: web::Json<AuditRequest>,
) -> Result<HttpResponse, ApiError> {
    tracing::info!(text_length = request.text.len(), "Audit requested");
    let report = service.audit_text(&request.text).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Extract claims only, so the caller can record predictions before the audit
#[utoipa::path(
    post,
    path = "/v1/claims",
    request_body = AuditRequest,
    responses(
        (status = 200, description = "Validated claims", body = ClaimsResponse),
        (status = 400, description = "Empty text", body = ErrorResponse),
        (status = 422, description = "No valid claims could be extracted", body = ErrorResponse),
        (status = 502, description = "Generation service error", body = ErrorResponse),
        (status = 504, description = "Generation service timed out", body = ErrorResponse)
    ),
    tag = "audit"
)]
#[post("/v1/claims")]
pub async fn extract_claims(
    service: web::Data<AuditService>,
    request: web::Json<AuditRequest>,
) -> Result<HttpResponse, ApiError> {
    tracing::info!(text_length = request.text.len(), "Claim extraction requested");
    let extracted = service.extract(&request.text).await?;
    Ok(HttpResponse::Ok().json(ClaimsResponse {
        extraction: extracted.extraction,
        notices: extracted.notices,
    }))
}

/// Audit previously extracted claims and score the caller's predictions
#[utoipa::path(
    post,
    path = "/v1/audit/compare",
    request_body = CompareRequest,
    responses(
        (status = 200, description = "Audit report and prediction accuracy", body = CompareResponse),
        (status = 400, description = "Invalid extraction or unknown claim id", body = ErrorResponse),
        (status = 502, description = "Generation service error", body = ErrorResponse),
        (status = 504, description = "Generation service timed out", body = ErrorResponse)
    ),
    tag = "audit"
)]
#[post("/v1/audit/compare")]
pub async fn compare_predictions(
    service: web::Data<AuditService>,
    request: web::Json<CompareRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    tracing::info!(
        claims = request.extraction.claims.len(),
        predicted_claims = request.predictions.len(),
        "Prediction comparison requested"
    );
    let compared = service
        .compare(&request.text, &request.extraction, &request.predictions)
        .await?;
    Ok(HttpResponse::Ok().json(CompareResponse {
        report: compared.report,
        accuracy: compared.accuracy,
    }))
}

/// Alternative explanations for one failed check
#[utoipa::path(
    post,
    path = "/v1/counterfactuals",
    request_body = CounterfactualRequest,
    responses(
        (status = 200, description = "Alternative explanations", body = CounterfactualResponse),
        (status = 400, description = "Missing claim quote or check name", body = ErrorResponse),
        (status = 502, description = "Generation service error", body = ErrorResponse),
        (status = 504, description = "Generation service timed out", body = ErrorResponse)
    ),
    tag = "audit"
)]
#[post("/v1/counterfactuals")]
pub async fn counterfactuals(
    service: web::Data<AuditService>,
    request: web::Json<CounterfactualRequest>,
) -> Result<HttpResponse, ApiError> {
    if request.claim_quote.trim().is_empty() || request.check_name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "claim_quote and check_name must not be empty".to_string(),
        ));
    }

    let alternatives = service
        .narrative()
        .counterfactuals(&request.claim_quote, &request.check_name, &request.explanation)
        .await?;
    Ok(HttpResponse::Ok().json(CounterfactualResponse { alternatives }))
}

/// Malformed JSON bodies get the uniform error body
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

/// Configure audit routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(audit_text)
        .service(extract_claims)
        .service(compare_predictions)
        .service(counterfactuals);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use super::*;
    use crate::model::GenerationConfig;
    use crate::service::llm::testing::ScriptedGenerator;
    use crate::service::{ClaimExtractionService, NarrativeService};

    const TEXT: &str = "Coffee drinking causes longevity according to a new report.";

    const EXTRACTION: &str = r#"{"claims": [{"claim_id": "c1", "quote": "Coffee drinking causes longevity", "claim_type": "causal", "confidence": 0.9}], "total_claims": 1}"#;

    const SUMMARY: &str = "The text asserts a causal effect of coffee on longevity without any experimental evidence.";

    fn data(generator: Arc<ScriptedGenerator>) -> web::Data<AuditService> {
        let config = GenerationConfig::default();
        web::Data::new(AuditService::new(
            ClaimExtractionService::new(generator.clone(), config.clone()),
            NarrativeService::new(generator, config),
        ))
    }

    #[actix_web::test]
    async fn test_audit_endpoint() {
        let generator = Arc::new(ScriptedGenerator::new([EXTRACTION, SUMMARY]));
        let app = test::init_service(App::new().app_data(data(generator)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/audit")
            .set_json(json!({ "text": TEXT }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["claim_audits"][0]["claim_id"], "c1");
        assert_eq!(body["claim_audits"][0]["overall_status"], "major_issues");
        assert_eq!(body["total_checks"], 7);
        assert_eq!(body["summary"], SUMMARY);
    }

    #[actix_web::test]
    async fn test_empty_text_is_bad_request() {
        let generator = Arc::new(ScriptedGenerator::new(Vec::<String>::new()));
        let app = test::init_service(App::new().app_data(data(generator)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/audit")
            .set_json(json!({ "text": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "bad_request");
        assert!(body["request_id"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_exhausted_extraction_is_unprocessable() {
        let generator = Arc::new(ScriptedGenerator::repeating("not json"));
        let app = test::init_service(App::new().app_data(data(generator)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/claims")
            .set_json(json!({ "text": TEXT }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_claims_endpoint_reports_short_text_notice() {
        let generator = Arc::new(ScriptedGenerator::new([EXTRACTION]));
        let app = test::init_service(App::new().app_data(data(generator)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/claims")
            .set_json(json!({ "text": TEXT }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["claims"][0]["claim_id"], "c1");
        assert_eq!(body["total_claims"], 1);
        let notices = body["notices"].as_array().unwrap();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].as_str().unwrap().starts_with("Short text (9 words)"));
    }

    #[actix_web::test]
    async fn test_claims_body_round_trips_into_compare() {
        let generator = Arc::new(ScriptedGenerator::new([EXTRACTION, SUMMARY]));
        let app = test::init_service(App::new().app_data(data(generator)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/claims")
            .set_json(json!({ "text": TEXT }))
            .to_request();
        let claims: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/v1/audit/compare")
            .set_json(json!({
                "text": TEXT,
                "extraction": claims,
                "predictions": { "c1": { "correlation": true } }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_compare_endpoint() {
        let generator = Arc::new(ScriptedGenerator::new([SUMMARY]));
        let app = test::init_service(App::new().app_data(data(generator)).configure(configure)).await;

        let extraction: Value = serde_json::from_str(EXTRACTION).unwrap();
        let req = test::TestRequest::post()
            .uri("/v1/audit/compare")
            .set_json(json!({
                "text": TEXT,
                "extraction": extraction,
                "predictions": { "c1": { "correlation": true, "base_rate": true } }
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["accuracy"]["per_claim"]["c1"]["caught"], json!(["correlation"]));
        assert_eq!(body["accuracy"]["false_positives"], 1);
        assert_eq!(body["report"]["claim_audits"][0]["claim_id"], "c1");
    }

    #[actix_web::test]
    async fn test_unknown_issue_type_is_bad_request() {
        let generator = Arc::new(ScriptedGenerator::new([SUMMARY]));
        let app = test::init_service(App::new().app_data(data(generator)).configure(configure)).await;

        let extraction: Value = serde_json::from_str(EXTRACTION).unwrap();
        let req = test::TestRequest::post()
            .uri("/v1/audit/compare")
            .set_json(json!({
                "text": TEXT,
                "extraction": extraction,
                "predictions": { "c1": { "astrology": true } }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_counterfactuals_endpoint() {
        let generator = Arc::new(ScriptedGenerator::new([
            "1. Wealthier people drink more coffee.\n2. Sick people quit coffee.",
        ]));
        let app = test::init_service(App::new().app_data(data(generator)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/counterfactuals")
            .set_json(json!({
                "claim_quote": "Coffee drinking causes longevity",
                "check_name": "Correlation vs Causation",
                "explanation": "Causal language without experimental evidence"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["alternatives"],
            json!(["Wealthier people drink more coffee.", "Sick people quit coffee."])
        );
    }
}
