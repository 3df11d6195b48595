use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

const ENV_CONFIG_PATH: &str = "SENTIMENT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

// Environment variable names
const ENV_MODEL_URL: &str = "SENTIMENT_MODEL_URL";
const ENV_MODEL_TOKEN: &str = "SENTIMENT_MODEL_TOKEN";
const ENV_DETECT_URL: &str = "LANGUAGE_DETECT_URL";
const ENV_DETECT_API_KEY: &str = "LANGUAGE_DETECT_API_KEY";
const ENV_HTTP_TIMEOUT: &str = "SENTIMENT_HTTP_TIMEOUT_SECS";
const ENV_CORS_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";

// Default values
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MODEL_NAME: &str = "cardiffnlp/twitter-xlm-roberta-base-sentiment";
const HF_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_DETECT_URL: &str = "https://ws.detectlanguage.com/0.2/detect";

/// Offset added to 0.6 when positive and negative keyword counts tie
pub const DEFAULT_TIE_OFFSET: f64 = 0.10;

/// Minimum detector confidence accepted without falling back
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f64 = 0.7;

/// Extra keywords merged into the built-in table for one language
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct KeywordOverride {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

/// How the keyword scorer resolves a positive/negative tie
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NeutralTieConfig {
    /// Constant offset, reproducible
    Fixed {
        #[serde(default = "default_tie_offset")]
        offset: f64,
    },
    /// Uniform offset in [0.05, 0.15] from a seeded generator
    Seeded { seed: u64 },
}

fn default_tie_offset() -> f64 {
    DEFAULT_TIE_OFFSET
}

impl Default for NeutralTieConfig {
    fn default() -> Self {
        NeutralTieConfig::Fixed {
            offset: DEFAULT_TIE_OFFSET,
        }
    }
}

/// Language detection section of the YAML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageDetectionFileConfig {
    pub min_confidence: Option<f64>,
}

/// Model section of the YAML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelFileConfig {
    pub name: Option<String>,
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub keywords: HashMap<String, KeywordOverride>,
    #[serde(default)]
    pub neutral_tie: NeutralTieConfig,
    #[serde(default)]
    pub language_detection: LanguageDetectionFileConfig,
    #[serde(default)]
    pub model: ModelFileConfig,
}

/// Pretrained classifier endpoint settings
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Inference endpoint; `None` runs keyword-only
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub name: String,
}

/// External language detection settings
#[derive(Debug, Clone)]
pub struct LanguageDetectionConfig {
    /// Detection endpoint; `None` uses the function-word fallback only
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub min_confidence: f64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub http_timeout: Duration,
    /// Origins allowed by CORS; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
    pub model: ModelConfig,
    pub language_detection: LanguageDetectionConfig,
    pub keywords: HashMap<String, KeywordOverride>,
    pub neutral_tie: NeutralTieConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            cors_allowed_origins: Vec::new(),
            model: ModelConfig {
                endpoint: None,
                token: None,
                name: DEFAULT_MODEL_NAME.to_string(),
            },
            language_detection: LanguageDetectionConfig {
                endpoint: None,
                api_key: None,
                min_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
            },
            keywords: HashMap::new(),
            neutral_tie: NeutralTieConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self::from_sources(file, |name| std::env::var(name).ok())
    }

    /// Combine the parsed file with values looked up by `env`
    fn from_sources(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = env("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let host = env("HOST").unwrap_or(defaults.host);
        let http_timeout = env(ENV_HTTP_TIMEOUT)
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);
        let cors_allowed_origins = env(ENV_CORS_ORIGINS)
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let model_name = file.model.name.unwrap_or(defaults.model.name);
        let model_token = env(ENV_MODEL_TOKEN).filter(|t| !t.is_empty());
        // A token alone targets the hosted inference API for the named model
        let model_endpoint = env(ENV_MODEL_URL).filter(|u| !u.is_empty()).or_else(|| {
            model_token
                .as_ref()
                .map(|_| format!("{}/{}", HF_INFERENCE_BASE_URL, model_name))
        });

        let detect_key = env(ENV_DETECT_API_KEY).filter(|k| !k.is_empty());
        let detect_endpoint = env(ENV_DETECT_URL)
            .filter(|u| !u.is_empty())
            .or_else(|| detect_key.as_ref().map(|_| DEFAULT_DETECT_URL.to_string()));

        Self {
            port,
            host,
            http_timeout,
            cors_allowed_origins,
            model: ModelConfig {
                endpoint: model_endpoint,
                token: model_token,
                name: model_name,
            },
            language_detection: LanguageDetectionConfig {
                endpoint: detect_endpoint,
                api_key: detect_key,
                min_confidence: file
                    .language_detection
                    .min_confidence
                    .unwrap_or(DEFAULT_MIN_DETECTION_CONFIDENCE),
            },
            keywords: file.keywords,
            neutral_tie: file.neutral_tie,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse_config_file(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration from file");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config_file(contents: &str) -> Result<ConfigFile, serde_yaml::Error> {
        let contents = contents.trim();
        if contents.is_empty() {
            return Ok(ConfigFile::default());
        }
        serde_yaml::from_str(contents)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
