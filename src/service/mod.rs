pub mod analyzer;
pub mod classifier;
pub mod keywords;
pub mod language;
pub mod text;
pub mod tie;

pub use analyzer::{AnalysisError, SentimentAnalyzer};
