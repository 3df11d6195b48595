//! Pretrained sentiment classifier client
//!
//! Talks to a Hugging Face Inference compatible endpoint serving a
//! three-class sentiment model and maps its labels onto [`Sentiment`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::{AnalysisMethod, ScoreDistribution, Sentiment, SentimentScore};

/// Text sent when checking that the endpoint answers at startup
const PROBE_TEXT: &str = "Service check";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Response contained no recognizable sentiment labels")]
    NoRecognizedLabels,
}

/// One class probability as returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Black-box text classifier returning per-class probabilities
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Model identifier, for logging
    fn name(&self) -> &str;

    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierError>;
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Text classification pipelines return one list per input; some servers
/// unwrap the single-input case
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batched(Vec<Vec<LabelScore>>),
    Single(Vec<LabelScore>),
}

/// Client for Hugging Face Inference API compatible endpoints
pub struct InferenceApiClassifier {
    client: Client,
    endpoint: Url,
    token: Option<String>,
    name: String,
}

impl InferenceApiClassifier {
    pub fn new(client: Client, endpoint: Url, token: Option<String>, name: String) -> Self {
        Self {
            client,
            endpoint,
            token,
            name,
        }
    }

    /// Classify a short fixed text to confirm the endpoint is usable
    pub async fn probe(&self) -> Result<(), ClassifierError> {
        let predictions = self.classify(PROBE_TEXT).await?;
        interpret(&predictions).map(|_| ())
    }

    fn parse_response(body: &str) -> Result<Vec<LabelScore>, ClassifierError> {
        let response: InferenceResponse = serde_json::from_str(body).map_err(|e| {
            ClassifierError::ParseError(format!("Failed to deserialize predictions: {}", e))
        })?;

        match response {
            InferenceResponse::Batched(batches) => batches
                .into_iter()
                .next()
                .ok_or_else(|| ClassifierError::ParseError("Empty prediction batch".to_string())),
            InferenceResponse::Single(predictions) => Ok(predictions),
        }
    }
}

#[async_trait]
impl SentimentClassifier for InferenceApiClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&InferenceRequest { inputs: text });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status { status, body });
        }

        let body = response.text().await?;
        Self::parse_response(&body)
    }
}

/// Map a model label onto a sentiment
///
/// Accepts descriptive labels ("Negative", "POSITIVE") and the positional
/// `LABEL_0`/`LABEL_1`/`LABEL_2` names of three-class models.
pub fn canonical_sentiment(label: &str) -> Option<Sentiment> {
    let label = label.to_uppercase();

    if label.contains("NEGATIVE") || label == "LABEL_0" {
        Some(Sentiment::Negative)
    } else if label.contains("POSITIVE") || label == "LABEL_2" {
        Some(Sentiment::Positive)
    } else if label.contains("NEUTRAL") || label == "LABEL_1" {
        Some(Sentiment::Neutral)
    } else {
        None
    }
}

/// Turn raw predictions into a score, picking the most probable class
///
/// Earlier predictions win ties. Unknown labels are skipped.
pub fn interpret(predictions: &[LabelScore]) -> Result<SentimentScore, ClassifierError> {
    let mut scores = ScoreDistribution::default();
    let mut best: Option<(Sentiment, f64)> = None;

    for prediction in predictions {
        let Some(sentiment) = canonical_sentiment(&prediction.label) else {
            tracing::debug!(label = %prediction.label, "Ignoring unrecognized model label");
            continue;
        };
        if !(0.0..=1.0).contains(&prediction.score) {
            return Err(ClassifierError::ParseError(format!(
                "Invalid probability {} for label {}",
                prediction.score, prediction.label
            )));
        }

        scores.set(sentiment, prediction.score);
        if best.is_none_or(|(_, max)| prediction.score > max) {
            best = Some((sentiment, prediction.score));
        }
    }

    let (sentiment, confidence) = best.ok_or(ClassifierError::NoRecognizedLabels)?;

    if (scores.total() - 1.0).abs() > 0.01 {
        tracing::debug!(total = scores.total(), "Model probabilities do not sum to one");
    }

    Ok(SentimentScore {
        sentiment,
        confidence,
        scores,
        method: AnalysisMethod::Model,
    })
}

/// Result of asking the model for a score
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    Scored(SentimentScore),
    Unavailable(String),
}

/// Scores text with a pretrained classifier, absorbing every failure
pub struct ModelScorer {
    classifier: Arc<dyn SentimentClassifier>,
}

impl ModelScorer {
    pub fn new(classifier: Arc<dyn SentimentClassifier>) -> Self {
        Self { classifier }
    }

    pub async fn score(&self, text: &str) -> ModelOutcome {
        let result = self
            .classifier
            .classify(text)
            .await
            .and_then(|predictions| interpret(&predictions));

        match result {
            Ok(score) => ModelOutcome::Scored(score),
            Err(e) => {
                tracing::warn!(
                    model = %self.classifier.name(),
                    error = %e,
                    "Model scoring failed, falling back to keywords"
                );
                ModelOutcome::Unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(label: &str, score: f64) -> LabelScore {
        LabelScore {
            label: label.to_string(),
            score,
        }
    }

    struct StaticClassifier(Result<Vec<LabelScore>, String>);

    #[async_trait]
    impl SentimentClassifier for StaticClassifier {
        fn name(&self) -> &str {
            "static"
        }

        async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, ClassifierError> {
            self.0.clone().map_err(ClassifierError::ParseError)
        }
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(canonical_sentiment("negative"), Some(Sentiment::Negative));
        assert_eq!(canonical_sentiment("Positive"), Some(Sentiment::Positive));
        assert_eq!(canonical_sentiment("neutral"), Some(Sentiment::Neutral));
        assert_eq!(canonical_sentiment("LABEL_0"), Some(Sentiment::Negative));
        assert_eq!(canonical_sentiment("label_1"), Some(Sentiment::Neutral));
        assert_eq!(canonical_sentiment("LABEL_2"), Some(Sentiment::Positive));
        assert_eq!(canonical_sentiment("LABEL_3"), None);
        assert_eq!(canonical_sentiment("joy"), None);
    }

    #[test]
    fn test_interpret_picks_max() {
        let score = interpret(&[
            label("negative", 0.1),
            label("neutral", 0.2),
            label("positive", 0.7),
        ])
        .unwrap();

        assert_eq!(score.sentiment, Sentiment::Positive);
        assert_eq!(score.confidence, 0.7);
        assert_eq!(score.method, AnalysisMethod::Model);
        assert_eq!(score.scores.negative, 0.1);
        assert_eq!(score.scores.neutral, 0.2);
    }

    #[test]
    fn test_interpret_first_wins_tie() {
        let score = interpret(&[label("LABEL_1", 0.5), label("LABEL_2", 0.5)]).unwrap();
        assert_eq!(score.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_interpret_rejects_unusable() {
        assert!(matches!(
            interpret(&[label("joy", 0.9)]),
            Err(ClassifierError::NoRecognizedLabels)
        ));
        assert!(matches!(interpret(&[]), Err(ClassifierError::NoRecognizedLabels)));
        assert!(matches!(
            interpret(&[label("positive", f64::NAN)]),
            Err(ClassifierError::ParseError(_))
        ));
        assert!(matches!(
            interpret(&[label("positive", 1.4), label("negative", -0.4)]),
            Err(ClassifierError::ParseError(_))
        ));
        assert!(interpret(&[label("positive", 1.0), label("negative", 0.0)]).is_ok());
    }

    #[test]
    fn test_parse_batched_and_single() {
        let batched = r#"[[{"label":"negative","score":0.8},{"label":"neutral","score":0.15},{"label":"positive","score":0.05}]]"#;
        let single = r#"[{"label":"LABEL_2","score":0.9}]"#;

        assert_eq!(InferenceApiClassifier::parse_response(batched).unwrap().len(), 3);
        assert_eq!(
            InferenceApiClassifier::parse_response(single).unwrap(),
            vec![label("LABEL_2", 0.9)]
        );
        assert!(InferenceApiClassifier::parse_response(r#"{"error":"loading"}"#).is_err());
        assert!(InferenceApiClassifier::parse_response("[]").is_err());
    }

    #[tokio::test]
    async fn test_scorer_absorbs_failures() {
        let failing = ModelScorer::new(Arc::new(StaticClassifier(Err("down".to_string()))));
        assert!(matches!(
            failing.score("text").await,
            ModelOutcome::Unavailable(_)
        ));

        let garbage = ModelScorer::new(Arc::new(StaticClassifier(Ok(vec![label("??", 1.0)]))));
        assert!(matches!(
            garbage.score("text").await,
            ModelOutcome::Unavailable(_)
        ));

        let out_of_range =
            ModelScorer::new(Arc::new(StaticClassifier(Ok(vec![label("positive", 3.2)]))));
        assert!(matches!(
            out_of_range.score("text").await,
            ModelOutcome::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_scorer_returns_model_score() {
        let scorer = ModelScorer::new(Arc::new(StaticClassifier(Ok(vec![
            label("negative", 0.6),
            label("neutral", 0.3),
            label("positive", 0.1),
        ]))));

        match scorer.score("text").await {
            ModelOutcome::Scored(score) => {
                assert_eq!(score.sentiment, Sentiment::Negative);
                assert_eq!(score.confidence, 0.6);
            }
            other => panic!("expected a score, got {other:?}"),
        }
    }
}
