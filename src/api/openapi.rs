//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::analyze::{AnalyzeRequest, AnalyzeResponse};
use crate::api::error::{ApiError, ErrorResponse};
use crate::api::health::HealthStatus;
use crate::model::{AnalysisMethod, AnalysisResult, ConfidenceLevel, ScoreDistribution, Sentiment};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Multilingual Sentiment API",
        description = "Classifies text as positive, negative or neutral"
    ),
    paths(crate::api::analyze::analyze, crate::api::health::health),
    components(schemas(
        AnalyzeRequest,
        AnalyzeResponse,
        AnalysisResult,
        AnalysisMethod,
        ConfidenceLevel,
        ScoreDistribution,
        Sentiment,
        HealthStatus,
        ErrorResponse
    )),
    tags(
        (name = "analysis", description = "Sentiment analysis"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> Result<HttpResponse, ApiError> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
