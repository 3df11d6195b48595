//! Sentiment analysis endpoint

use std::time::Instant;

use actix_web::{HttpResponse, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::app::AppState;
use crate::model::AnalysisResult;
use crate::service::analyzer::round_to;

/// Characters of input echoed into the request log
const LOG_PREVIEW_CHARS: usize = 50;

/// Request body for sentiment analysis
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Text to classify
    #[serde(default)]
    pub text: Option<String>,
}

/// Analysis result with timing metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,
    /// Seconds spent analyzing, rounded to milliseconds
    pub processing_time: f64,
    /// ISO-8601 completion time
    pub timestamp: String,
}

/// Analyze the sentiment of a text
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Text analyzed", body = AnalyzeResponse),
        (status = 400, description = "No text provided", body = ErrorResponse),
        (status = 500, description = "Analyzer unavailable or analysis failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/api/analyze")]
pub async fn analyze(
    state: web::Data<AppState>,
    body: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, ApiError> {
    let analyzer = state.analyzer.ready().ok_or(ApiError::AnalyzerUnavailable)?;

    let text = body.text.as_deref().unwrap_or_default().trim();
    if text.is_empty() {
        return Err(ApiError::NoText);
    }

    let start_time = Instant::now();
    let result = analyzer.analyze(text).await?;
    let processing_time = round_to(start_time.elapsed().as_secs_f64(), 3);

    tracing::info!(
        text = %text.chars().take(LOG_PREVIEW_CHARS).collect::<String>(),
        sentiment = %result.sentiment,
        language = %result.language,
        method = ?result.analysis_method,
        processing_time = processing_time,
        "Analyzed text"
    );

    Ok(HttpResponse::Ok().json(AnalyzeResponse {
        result,
        processing_time,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(err.to_string()).into()
    }))
    .service(analyze);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use super::*;
    use crate::model::{AnalysisMethod, Sentiment};
    use crate::service::SentimentAnalyzer;
    use crate::service::keywords::{KeywordScorer, KeywordTables};
    use crate::service::language::LanguageDetector;
    use crate::service::tie::TieBreaker;

    fn keyword_state() -> web::Data<AppState> {
        web::Data::new(AppState::with_analyzer(SentimentAnalyzer::new(
            LanguageDetector::fallback_only(),
            None,
            KeywordScorer::new(KeywordTables::builtin(), TieBreaker::default()),
        )))
    }

    #[actix_web::test]
    async fn test_analyze_example() {
        let app = test::init_service(App::new().app_data(keyword_state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(json!({ "text": "  I love this, it is amazing and wonderful " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: AnalyzeResponse = test::read_body_json(resp).await;
        assert_eq!(body.result.text, "I love this, it is amazing and wonderful");
        assert_eq!(body.result.sentiment, Sentiment::Positive);
        assert_eq!(body.result.confidence, 0.95);
        assert_eq!(body.result.analysis_method, AnalysisMethod::Keyword);
        assert!(body.processing_time >= 0.0);
        assert!(chrono::DateTime::parse_from_rfc3339(&body.timestamp).is_ok());
    }

    #[actix_web::test]
    async fn test_response_is_flat() {
        let app = test::init_service(App::new().app_data(keyword_state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(json!({ "text": "Der Film war schlecht" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["language"], "de");
        assert_eq!(body["language_name"], "German");
        assert_eq!(body["sentiment"], "negative");
        assert_eq!(body["confidence_level"], "Medium");
        assert_eq!(body["analysis_method"], "keyword");
        assert!(body["scores"]["neutral"].is_number());
        assert!(body["processing_time"].is_number());
        assert!(body.get("result").is_none());
    }

    #[actix_web::test]
    async fn test_missing_or_blank_text() {
        let app = test::init_service(App::new().app_data(keyword_state()).configure(configure)).await;

        for payload in [json!({}), json!({ "text": "   " }), json!({ "text": null })] {
            let req = test::TestRequest::post()
                .uri("/api/analyze")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "No text provided");
        }
    }

    #[actix_web::test]
    async fn test_malformed_body() {
        let app = test::init_service(App::new().app_data(keyword_state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unavailable_analyzer() {
        let state = web::Data::new(AppState::unavailable("init failed"));
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(json!({ "text": "hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Sentiment analyzer not available");
    }
}
