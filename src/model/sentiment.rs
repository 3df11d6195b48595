//! Sentiment analysis result model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Polarity label assigned to a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring strategy that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMethod {
    /// Pretrained classifier
    Model,
    /// Keyword-count heuristic
    Keyword,
}

/// Human-readable confidence tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ConfidenceLevel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Medium,
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
}

impl ConfidenceLevel {
    /// Bucket a confidence value into its tier
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.9 {
            ConfidenceLevel::VeryHigh
        } else if confidence >= 0.8 {
            ConfidenceLevel::High
        } else if confidence >= 0.7 {
            ConfidenceLevel::Medium
        } else if confidence >= 0.6 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }
}

/// Probability assigned to each sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ScoreDistribution {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl ScoreDistribution {
    pub fn get(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn set(&mut self, sentiment: Sentiment, value: f64) {
        match sentiment {
            Sentiment::Positive => self.positive = value,
            Sentiment::Negative => self.negative = value,
            Sentiment::Neutral => self.neutral = value,
        }
    }

    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }

    /// Apply `f` to every value
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            positive: f(self.positive),
            neutral: f(self.neutral),
            negative: f(self.negative),
        }
    }
}

/// Output of a single scoring strategy, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentScore {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub scores: ScoreDistribution,
    pub method: AnalysisMethod,
}

/// Normalized analysis result returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    /// Original input text, before cleaning
    pub text: String,
    pub sentiment: Sentiment,
    /// Winning probability, rounded to 3 decimals
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    /// Confidence as a percentage, rounded to 1 decimal
    pub confidence_percentage: f64,
    pub scores: ScoreDistribution,
    /// Detected language code
    pub language: String,
    pub language_name: String,
    pub analysis_method: AnalysisMethod,
}
