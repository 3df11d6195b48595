//! Text preparation shared by the detectors and scorers

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\S+|https\S+").expect("valid URL pattern"));

static PUNCTUATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation pattern"));

/// Remove URLs and collapse runs of whitespace into single spaces
pub fn clean_text(text: &str) -> String {
    let without_urls = URL_PATTERN.replace_all(text, "");
    without_urls.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase and drop everything that is neither a word character nor whitespace
pub fn strip_punctuation(text: &str) -> String {
    PUNCTUATION_PATTERN
        .replace_all(&text.to_lowercase(), "")
        .into_owned()
}
