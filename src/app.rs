//! Application state and service initialization
//!
//! Builds the single analyzer shared by every request. A failed build is kept
//! as an explicit unavailable state so the server still starts and reports it.

use std::sync::Arc;

use crate::model::Config;
use crate::service::SentimentAnalyzer;

/// Readiness of the shared analyzer
pub enum AnalyzerState {
    Ready(Arc<SentimentAnalyzer>),
    Unavailable { reason: String },
}

impl AnalyzerState {
    pub fn ready(&self) -> Option<&Arc<SentimentAnalyzer>> {
        match self {
            AnalyzerState::Ready(analyzer) => Some(analyzer),
            AnalyzerState::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready().is_some()
    }

    /// Why initialization failed, if it did
    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            AnalyzerState::Ready(_) => None,
            AnalyzerState::Unavailable { reason } => Some(reason),
        }
    }
}

/// Application state injected into Actix-web handlers
pub struct AppState {
    pub analyzer: AnalyzerState,
}

impl AppState {
    /// Initialize the analyzer from configuration
    pub async fn new(config: &Config) -> Self {
        let analyzer = match SentimentAnalyzer::from_config(config).await {
            Ok(analyzer) => {
                tracing::info!(
                    model_loaded = analyzer.model_loaded(),
                    "Sentiment analyzer initialized"
                );
                AnalyzerState::Ready(Arc::new(analyzer))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize sentiment analyzer");
                AnalyzerState::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        Self { analyzer }
    }

    #[cfg(test)]
    pub fn with_analyzer(analyzer: SentimentAnalyzer) -> Self {
        Self {
            analyzer: AnalyzerState::Ready(Arc::new(analyzer)),
        }
    }

    #[cfg(test)]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            analyzer: AnalyzerState::Unavailable {
                reason: reason.into(),
            },
        }
    }
}
