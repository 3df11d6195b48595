pub mod config;
pub mod language;
pub mod sentiment;

pub use config::{
    Config, DEFAULT_MIN_DETECTION_CONFIDENCE, KeywordOverride, NeutralTieConfig,
};
pub use language::language_name;
pub use sentiment::*;
