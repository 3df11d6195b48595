//! Health check endpoint

use actix_web::{HttpResponse, Responder, get, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    /// Whether the analyzer initialized at startup
    pub analyzer_ready: bool,
    /// Initialization failure, when the analyzer is not ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer_error: Option<String>,
    /// Whether the pretrained model answered at startup
    pub model_loaded: bool,
    pub version: String,
    pub timestamp: String,
}

/// Health check
///
/// Always returns 200 OK while the process is serving; readiness of the
/// analyzer is reported in the body.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/api/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let analyzer = state.analyzer.ready();

    HttpResponse::Ok().json(HealthStatus {
        status: "healthy".to_string(),
        analyzer_ready: analyzer.is_some(),
        analyzer_error: state.analyzer.unavailable_reason().map(str::to_string),
        model_loaded: analyzer.is_some_and(|a| a.model_loaded()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
