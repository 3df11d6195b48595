//! Keyword-count sentiment scoring
//!
//! Used when no pretrained classifier is available or it fails. Counts how many
//! curated polarity cues for the detected language appear in the text and
//! synthesizes a score distribution from the winning confidence.

use std::collections::HashMap;

use crate::model::{AnalysisMethod, KeywordOverride, ScoreDistribution, Sentiment, SentimentScore};
use crate::service::text::strip_punctuation;
use crate::service::tie::TieBreaker;

const BASE_CONFIDENCE: f64 = 0.65;
const PER_KEYWORD_CONFIDENCE: f64 = 0.1;
const MAX_KEYWORD_CONFIDENCE: f64 = 0.95;
const NEUTRAL_BASE_CONFIDENCE: f64 = 0.6;

/// Share of the remainder given to neutral when a polarity wins
const WIN_NEUTRAL_SHARE: f64 = 0.7;
/// Share of the remainder given to the opposite polarity when a polarity wins
const WIN_OPPOSITE_SHARE: f64 = 0.3;

const BUILTIN_POSITIVE: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "love", "amazing", "great", "excellent", "fantastic", "perfect", "wonderful", "best",
            "awesome", "brilliant",
        ],
    ),
    (
        "es",
        &[
            "amor", "increíble", "excelente", "fantástico", "perfecto", "maravilloso", "mejor",
            "genial", "brillante",
        ],
    ),
    (
        "fr",
        &[
            "amour", "incroyable", "excellent", "fantastique", "parfait", "merveilleux",
            "meilleur", "génial",
        ],
    ),
    (
        "de",
        &[
            "liebe", "erstaunlich", "ausgezeichnet", "fantastisch", "perfekt", "wunderbar",
            "beste", "toll",
        ],
    ),
];

const BUILTIN_NEGATIVE: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "hate", "terrible", "awful", "horrible", "worst", "bad", "disappointing", "disgusting",
            "pathetic",
        ],
    ),
    (
        "es",
        &[
            "odio", "terrible", "horrible", "pésimo", "malo", "decepcionante", "asqueroso",
            "patético",
        ],
    ),
    (
        "fr",
        &[
            "déteste", "terrible", "horrible", "pire", "mauvais", "décevant", "dégoûtant",
            "pathétique",
        ],
    ),
    (
        "de",
        &[
            "hasse", "schrecklich", "furchtbar", "schlimmste", "schlecht", "enttäuschend",
            "ekelhaft",
        ],
    ),
];

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum KeywordTableError {
    #[error("Keyword '{keyword}' is both positive and negative for language '{language}'")]
    Overlap { language: String, keyword: String },
}

/// Positive and negative cues for one language
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordTable {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl KeywordTable {
    fn extend(&mut self, extra: &KeywordOverride) {
        push_unique(&mut self.positive, &extra.positive);
        push_unique(&mut self.negative, &extra.negative);
    }

    fn overlap(&self) -> Option<&str> {
        self.positive
            .iter()
            .find(|word| self.negative.contains(word))
            .map(String::as_str)
    }
}

fn push_unique(target: &mut Vec<String>, words: &[String]) {
    for word in words {
        let word = word.trim().to_lowercase();
        if !word.is_empty() && !target.contains(&word) {
            target.push(word);
        }
    }
}

/// Per-language keyword tables, fixed after startup
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTables {
    tables: HashMap<String, KeywordTable>,
}

impl KeywordTables {
    /// The built-in English, Spanish, French and German tables
    pub fn builtin() -> Self {
        let mut tables: HashMap<String, KeywordTable> = HashMap::new();

        for (language, words) in BUILTIN_POSITIVE {
            tables.entry(language.to_string()).or_default().positive =
                words.iter().map(|w| w.to_string()).collect();
        }
        for (language, words) in BUILTIN_NEGATIVE {
            tables.entry(language.to_string()).or_default().negative =
                words.iter().map(|w| w.to_string()).collect();
        }

        Self { tables }
    }

    /// Built-in tables extended with configured keywords
    ///
    /// Languages absent from the built-in set are added. Fails if any language
    /// ends up with a keyword on both sides.
    pub fn with_overrides(
        overrides: &HashMap<String, KeywordOverride>,
    ) -> Result<Self, KeywordTableError> {
        let mut tables = Self::builtin();

        for (language, extra) in overrides {
            let language = language.to_lowercase();
            tables.tables.entry(language.clone()).or_default().extend(extra);
            tracing::debug!(
                language = %language,
                positive = extra.positive.len(),
                negative = extra.negative.len(),
                "Extended keyword table"
            );
        }

        for (language, table) in &tables.tables {
            if let Some(keyword) = table.overlap() {
                return Err(KeywordTableError::Overlap {
                    language: language.clone(),
                    keyword: keyword.to_string(),
                });
            }
        }

        Ok(tables)
    }

    pub fn get(&self, language: &str) -> Option<&KeywordTable> {
        self.tables.get(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

/// Number of distinct positive and negative cues present in a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeywordCounts {
    pub positive: usize,
    pub negative: usize,
}

/// Keyword-based fallback scorer
#[derive(Debug)]
pub struct KeywordScorer {
    tables: KeywordTables,
    tie_breaker: TieBreaker,
}

impl KeywordScorer {
    pub fn new(tables: KeywordTables, tie_breaker: TieBreaker) -> Self {
        Self {
            tables,
            tie_breaker,
        }
    }

    /// Count cues for `language`; unsupported languages count zero
    pub fn count(&self, text: &str, language: &str) -> KeywordCounts {
        let Some(table) = self.tables.get(language) else {
            return KeywordCounts::default();
        };

        let stripped = strip_punctuation(text);
        let present = |words: &[String]| {
            words
                .iter()
                .filter(|word| stripped.contains(word.as_str()))
                .count()
        };

        KeywordCounts {
            positive: present(&table.positive),
            negative: present(&table.negative),
        }
    }

    pub fn score(&self, text: &str, language: &str) -> SentimentScore {
        let counts = self.count(text, language);

        let (sentiment, confidence) = if counts.positive > counts.negative {
            (Sentiment::Positive, polarity_confidence(counts.positive))
        } else if counts.negative > counts.positive {
            (Sentiment::Negative, polarity_confidence(counts.negative))
        } else {
            (
                Sentiment::Neutral,
                NEUTRAL_BASE_CONFIDENCE + self.tie_breaker.offset(),
            )
        };

        tracing::debug!(
            language = %language,
            positive = counts.positive,
            negative = counts.negative,
            sentiment = %sentiment,
            confidence = confidence,
            "Keyword scoring complete"
        );

        SentimentScore {
            sentiment,
            confidence,
            scores: synthesize_distribution(sentiment, confidence),
            method: AnalysisMethod::Keyword,
        }
    }
}

fn polarity_confidence(count: usize) -> f64 {
    (BASE_CONFIDENCE + count as f64 * PER_KEYWORD_CONFIDENCE).min(MAX_KEYWORD_CONFIDENCE)
}

/// Spread the remainder of `confidence` over the two losing labels
fn synthesize_distribution(winner: Sentiment, confidence: f64) -> ScoreDistribution {
    let remainder = 1.0 - confidence;
    let mut scores = ScoreDistribution::default();
    scores.set(winner, confidence);

    match winner {
        Sentiment::Positive => {
            scores.neutral = remainder * WIN_NEUTRAL_SHARE;
            scores.negative = remainder * WIN_OPPOSITE_SHARE;
        }
        Sentiment::Negative => {
            scores.neutral = remainder * WIN_NEUTRAL_SHARE;
            scores.positive = remainder * WIN_OPPOSITE_SHARE;
        }
        Sentiment::Neutral => {
            scores.positive = remainder * 0.5;
            scores.negative = remainder * 0.5;
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> KeywordScorer {
        KeywordScorer::new(KeywordTables::builtin(), TieBreaker::default())
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_builtin_tables_are_disjoint() {
        let tables = KeywordTables::builtin();
        let mut languages: Vec<_> = tables.languages().collect();
        languages.sort();

        assert_eq!(languages, vec!["de", "en", "es", "fr"]);
        for language in languages {
            assert!(tables.get(language).unwrap().overlap().is_none());
        }
    }

    #[test]
    fn test_three_positive_keywords() {
        let result = scorer().score("I love this, it is amazing and wonderful", "en");

        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.method, AnalysisMethod::Keyword);
        assert_close(result.confidence, 0.95);
        assert_close(result.scores.positive, 0.95);
        assert_close(result.scores.neutral, 0.035);
        assert_close(result.scores.negative, 0.015);
    }

    #[test]
    fn test_positive_only_in_every_language() {
        let samples = [
            ("en", "what a great day"),
            ("es", "es un día increíble y maravilloso"),
            ("fr", "c'est parfait"),
            ("de", "das ist wunderbar und toll"),
        ];

        for (language, text) in samples {
            let result = scorer().score(text, language);
            assert_eq!(result.sentiment, Sentiment::Positive, "{language}");
            assert!((0.65..=0.95).contains(&result.confidence), "{language}");
        }
    }

    #[test]
    fn test_negative_mirrors_split() {
        let result = scorer().score("This was a terrible, awful movie", "en");

        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_close(result.confidence, 0.85);
        assert_close(result.scores.neutral, 0.15 * 0.7);
        assert_close(result.scores.positive, 0.15 * 0.3);
    }

    #[test]
    fn test_tie_is_neutral() {
        let result = scorer().score("I love the food but hate the service", "en");

        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!((0.6..=0.75).contains(&result.confidence));
        assert_close(result.scores.positive, result.scores.negative);
    }

    #[test]
    fn test_seeded_tie_stays_in_range() {
        let scorer = KeywordScorer::new(KeywordTables::builtin(), TieBreaker::seeded(3));
        for _ in 0..20 {
            let result = scorer.score("nothing to see here", "en");
            assert_eq!(result.sentiment, Sentiment::Neutral);
            assert!((0.65..=0.75).contains(&result.confidence));
        }
    }

    #[test]
    fn test_unsupported_language_counts_zero() {
        let scorer = scorer();
        assert_eq!(scorer.count("love love great", "ja"), KeywordCounts::default());
        assert_eq!(scorer.score("love", "ja").sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_each_keyword_counts_once() {
        let counts = scorer().count("great great great", "en");
        assert_eq!(counts.positive, 1);
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let texts = [
            "love amazing great excellent fantastic perfect",
            "bad",
            "plain text",
            "hate love",
        ];
        for text in texts {
            let result = scorer().score(text, "en");
            assert!((result.scores.total() - 1.0).abs() < 0.01);
            for sentiment in [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative] {
                assert!((0.0..=1.0).contains(&result.scores.get(sentiment)));
            }
            assert_close(result.scores.get(result.sentiment), result.confidence);
        }
    }

    #[test]
    fn test_overrides_extend_tables() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "IT".to_string(),
            KeywordOverride {
                positive: vec!["Bellissimo".to_string()],
                negative: vec!["orribile".to_string()],
            },
        );
        overrides.insert(
            "en".to_string(),
            KeywordOverride {
                positive: vec!["superb".to_string(), "love".to_string()],
                negative: vec![],
            },
        );

        let tables = KeywordTables::with_overrides(&overrides).unwrap();

        assert_eq!(tables.get("it").unwrap().positive, vec!["bellissimo"]);
        let en = tables.get("en").unwrap();
        assert!(en.positive.contains(&"superb".to_string()));
        assert_eq!(en.positive.iter().filter(|w| *w == "love").count(), 1);

        let scorer = KeywordScorer::new(tables, TieBreaker::default());
        assert_eq!(
            scorer.score("un film bellissimo", "it").sentiment,
            Sentiment::Positive
        );
    }

    #[test]
    fn test_overlapping_override_rejected() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "en".to_string(),
            KeywordOverride {
                positive: vec!["terrible".to_string()],
                negative: vec![],
            },
        );

        let err = KeywordTables::with_overrides(&overrides).unwrap_err();
        assert!(matches!(
            err,
            KeywordTableError::Overlap { ref keyword, .. } if keyword == "terrible"
        ));
    }
}
