//! Language detection
//!
//! Asks an external detection service first and trusts its answer only above
//! a confidence threshold. Otherwise a small function-word matcher decides.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Returned when neither the service nor the cue matcher recognizes the text
pub const DEFAULT_LANGUAGE: &str = "en";

/// Cues checked in priority order by the fallback matcher
const FALLBACK_CUES: &[(&str, &[&str])] = &[
    ("en", &["the", "and", "is", "this", "that"]),
    ("es", &["el", "la", "es", "este", "¡", "¿"]),
    ("fr", &["le", "la", "est", "ce", "ç"]),
    ("de", &["der", "die", "das", "ist", "ü", "ä", "ö"]),
];

#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("No language detected")]
    NoDetection,
}

/// A language guess with the detector's self-reported confidence
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub language: String,
    pub confidence: f64,
}

/// External language identification backend
#[async_trait]
pub trait LanguageDetectionService: Send + Sync {
    async fn detect(&self, text: &str) -> Result<Detection, DetectorError>;
}

/// What the external service contributed for one text
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    /// Confident enough to use as-is
    Detected(Detection),
    /// Answered, but at or below the threshold
    LowConfidence(Detection),
    /// Call failed
    Unavailable(String),
}

#[derive(Debug, Deserialize)]
struct DetectLanguageResponse {
    data: DetectionData,
}

#[derive(Debug, Deserialize)]
struct DetectionData {
    #[serde(default)]
    detections: Vec<RawDetection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetection {
    language: String,
    #[serde(default)]
    is_reliable: bool,
    confidence: f64,
}

/// Client for detectlanguage.com compatible endpoints
pub struct DetectLanguageClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl DetectLanguageClient {
    pub fn new(client: Client, endpoint: Url, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    fn parse_response(body: &str) -> Result<Detection, DetectorError> {
        let response: DetectLanguageResponse = serde_json::from_str(body)
            .map_err(|e| DetectorError::ParseError(format!("Invalid detection response: {}", e)))?;

        let first = response
            .data
            .detections
            .into_iter()
            .next()
            .ok_or(DetectorError::NoDetection)?;

        tracing::trace!(
            language = %first.language,
            reliable = first.is_reliable,
            confidence = first.confidence,
            "Language service response"
        );

        Ok(Detection {
            language: first.language.to_lowercase(),
            confidence: first.confidence.clamp(0.0, 1.0),
        })
    }
}

#[async_trait]
impl LanguageDetectionService for DetectLanguageClient {
    async fn detect(&self, text: &str) -> Result<Detection, DetectorError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .form(&[("q", text)]);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DetectorError::ParseError(format!(
                "Unexpected status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        Self::parse_response(&body)
    }
}

/// Service-first language detector with a function-word fallback
pub struct LanguageDetector {
    service: Option<Arc<dyn LanguageDetectionService>>,
    min_confidence: f64,
}

impl LanguageDetector {
    pub fn new(service: Option<Arc<dyn LanguageDetectionService>>, min_confidence: f64) -> Self {
        Self {
            service,
            min_confidence,
        }
    }

    /// Detector that only uses the function-word matcher
    pub fn fallback_only() -> Self {
        Self::new(None, crate::model::DEFAULT_MIN_DETECTION_CONFIDENCE)
    }

    /// Ask the external service; `None` when no service is configured
    pub async fn query_service(&self, text: &str) -> Option<DetectionOutcome> {
        let service = self.service.as_ref()?;

        let outcome = match service.detect(text).await {
            Ok(detection) if detection.confidence > self.min_confidence => {
                DetectionOutcome::Detected(detection)
            }
            Ok(detection) => DetectionOutcome::LowConfidence(detection),
            Err(e) => DetectionOutcome::Unavailable(e.to_string()),
        };

        Some(outcome)
    }

    /// Language code for `text`, never failing
    pub async fn detect(&self, text: &str) -> String {
        match self.query_service(text).await {
            Some(DetectionOutcome::Detected(detection)) => return detection.language,
            Some(DetectionOutcome::LowConfidence(detection)) => {
                tracing::debug!(
                    language = %detection.language,
                    confidence = detection.confidence,
                    threshold = self.min_confidence,
                    "Language detection below threshold, using fallback"
                );
            }
            Some(DetectionOutcome::Unavailable(reason)) => {
                tracing::warn!(error = %reason, "Language detection service failed, using fallback");
            }
            None => {}
        }

        detect_by_cues(text).to_string()
    }
}

/// Match characteristic function words and characters in priority order
///
/// Cues are plain substrings of the lowercased text, so "ist" contains the
/// English "is".
pub fn detect_by_cues(text: &str) -> &'static str {
    let lowered = text.to_lowercase();

    FALLBACK_CUES
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| lowered.contains(*cue)))
        .map(|(language, _)| *language)
        .unwrap_or(DEFAULT_LANGUAGE)
}
