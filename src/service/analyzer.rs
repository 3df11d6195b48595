//! Sentiment analysis orchestration
//!
//! Cleans the input, detects its language, scores it with the pretrained model
//! when one is loaded (keywords otherwise) and normalizes the result.

use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::model::{
    AnalysisResult, ConfidenceLevel, Config, SentimentScore, language_name,
};
use crate::service::classifier::{InferenceApiClassifier, ModelOutcome, ModelScorer};
use crate::service::keywords::{KeywordScorer, KeywordTableError, KeywordTables};
use crate::service::language::{DetectLanguageClient, LanguageDetectionService, LanguageDetector};
use crate::service::text::clean_text;
use crate::service::tie::TieBreaker;

/// Errors returned for a single analysis request
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("Empty text provided")]
    EmptyText,
}

/// Errors building the analyzer at startup
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AnalyzerInitError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid {name} endpoint '{url}': {reason}")]
    InvalidEndpoint {
        name: &'static str,
        url: String,
        reason: String,
    },

    #[error("Invalid keyword configuration: {0}")]
    Keywords(#[from] KeywordTableError),
}

/// Multilingual sentiment analyzer
pub struct SentimentAnalyzer {
    detector: LanguageDetector,
    model: Option<ModelScorer>,
    keywords: KeywordScorer,
}

impl SentimentAnalyzer {
    pub fn new(
        detector: LanguageDetector,
        model: Option<ModelScorer>,
        keywords: KeywordScorer,
    ) -> Self {
        Self {
            detector,
            model,
            keywords,
        }
    }

    /// Build the analyzer and its external clients from configuration
    ///
    /// An unreachable model is not an error: the analyzer runs keyword-only.
    pub async fn from_config(config: &Config) -> Result<Self, AnalyzerInitError> {
        let client = Client::builder().timeout(config.http_timeout).build()?;

        let tables = KeywordTables::with_overrides(&config.keywords)?;
        let mut languages: Vec<&str> = tables.languages().collect();
        languages.sort_unstable();
        tracing::info!(languages = ?languages, "Keyword tables loaded");

        let keywords = KeywordScorer::new(tables, TieBreaker::from(&config.neutral_tie));

        let detection_service = match &config.language_detection.endpoint {
            Some(endpoint) => {
                let url = parse_endpoint("language detection", endpoint)?;
                tracing::info!(endpoint = %url, "Language detection service configured");
                Some(Arc::new(DetectLanguageClient::new(
                    client.clone(),
                    url,
                    config.language_detection.api_key.clone(),
                )) as Arc<dyn LanguageDetectionService>)
            }
            None => {
                tracing::info!("No language detection service configured, using function-word matching");
                None
            }
        };
        let detector = LanguageDetector::new(
            detection_service,
            config.language_detection.min_confidence,
        );

        let model = match &config.model.endpoint {
            Some(endpoint) => {
                let url = parse_endpoint("sentiment model", endpoint)?;
                let classifier = InferenceApiClassifier::new(
                    client,
                    url,
                    config.model.token.clone(),
                    config.model.name.clone(),
                );

                match classifier.probe().await {
                    Ok(()) => {
                        tracing::info!(model = %config.model.name, "Sentiment model loaded");
                        Some(ModelScorer::new(Arc::new(classifier)))
                    }
                    Err(e) => {
                        tracing::warn!(
                            model = %config.model.name,
                            error = %e,
                            "Sentiment model unavailable, using keyword analysis"
                        );
                        None
                    }
                }
            }
            None => {
                tracing::info!("No sentiment model configured, using keyword analysis");
                None
            }
        };

        Ok(Self::new(detector, model, keywords))
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Analyze the sentiment of `text`
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyText);
        }

        let cleaned = clean_text(text);
        let language = self.detector.detect(&cleaned).await;

        let model_score = match &self.model {
            Some(model) => match model.score(&cleaned).await {
                ModelOutcome::Scored(score) => Some(score),
                ModelOutcome::Unavailable(_) => None,
            },
            None => None,
        };
        let score = model_score.unwrap_or_else(|| self.keywords.score(&cleaned, &language));

        tracing::debug!(
            language = %language,
            method = ?score.method,
            sentiment = %score.sentiment,
            confidence = score.confidence,
            "Analysis complete"
        );

        Ok(normalize(text, language, score))
    }
}

fn parse_endpoint(name: &'static str, endpoint: &str) -> Result<Url, AnalyzerInitError> {
    Url::parse(endpoint).map_err(|e| AnalyzerInitError::InvalidEndpoint {
        name,
        url: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Build the public result from a raw score
fn normalize(text: &str, language: String, score: SentimentScore) -> AnalysisResult {
    AnalysisResult {
        text: text.to_string(),
        sentiment: score.sentiment,
        confidence: round_to(score.confidence, 3),
        confidence_level: ConfidenceLevel::from_confidence(score.confidence),
        confidence_percentage: round_to(score.confidence * 100.0, 1),
        scores: score.scores.map(|v| round_to(v, 3)),
        language_name: language_name(&language).to_string(),
        language,
        analysis_method: score.method,
    }
}
