use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::analysis::scoring::ScoringWeights;
use crate::analysis::stopwords::default_stopwords;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:3b";
const DEFAULT_KEYWORD_LIMIT: usize = 20;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Rejected configuration or input format. Terminal for the request that hit it.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("scoring weight for {component} must be between 0 and 100, got {weight}")]
    WeightOutOfRange { component: &'static str, weight: u32 },

    #[error("scoring weights must sum to 100, got {0}")]
    WeightsSum(u32),

    #[error("expected 5 scoring weights (keyword_match, structure, content_quality, technical_skills, ats_formatting), got {0}")]
    WeightsCount(usize),

    #[error("invalid scoring weight '{0}'")]
    WeightsParse(String),

    #[error("model_name must not be blank")]
    BlankModelName,

    #[error("stopword list must not be empty")]
    EmptyStopwords,

    #[error("keyword_limit must be at least 1")]
    KeywordLimit,

    #[error("unsupported file format '{0}': upload a PDF or DOCX file")]
    UnsupportedFormat(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub assistant_timeout_secs: u64,
    pub scoring_weights: String,
    pub stopwords: Option<Vec<String>>,
    pub keyword_limit: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let stopwords = match std::env::var("STOPWORDS_FILE") {
            Ok(path) => Some(load_stopwords(Path::new(&path))?),
            Err(_) => None,
        };

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ollama_url: std::env::var("OLLAMA_URL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string()),
            ollama_model: std::env::var("OLLAMA_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            assistant_timeout_secs: parse_env("ASSISTANT_TIMEOUT_SECS", 60)?,
            scoring_weights: std::env::var("SCORING_WEIGHTS")
                .unwrap_or_else(|_| "35,25,20,15,5".to_string()),
            stopwords,
            keyword_limit: parse_env("KEYWORD_LIMIT", DEFAULT_KEYWORD_LIMIT)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }

    /// Validates the analysis-related options. Called once at startup; the result
    /// becomes the default settings every session starts from.
    pub fn analysis_settings(&self) -> Result<AnalysisSettings, ConfigError> {
        AnalysisSettings {
            model_name: self.ollama_model.clone(),
            weights: ScoringWeights::parse(&self.scoring_weights)?,
            stopwords: self.stopwords.clone().unwrap_or_else(default_stopwords),
            keyword_limit: self.keyword_limit,
        }
        .validated()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Reads a stopword file: one word per line, `#` starts a comment line.
pub fn load_stopwords(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stopword file {}", path.display()))?;
    Ok(raw
        .lines()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect())
}

/// The validated option set an analysis runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub model_name: String,
    pub weights: ScoringWeights,
    pub stopwords: Vec<String>,
    pub keyword_limit: usize,
}

/// Per-session overrides supplied when a session starts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsOverrides {
    pub model_name: Option<String>,
    pub scoring_weights: Option<ScoringWeights>,
    pub stopwords: Option<Vec<String>>,
}

impl AnalysisSettings {
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::BlankModelName);
        }
        if self.stopwords.iter().all(|w| w.trim().is_empty()) {
            return Err(ConfigError::EmptyStopwords);
        }
        if self.keyword_limit == 0 {
            return Err(ConfigError::KeywordLimit);
        }
        self.weights.validate()?;
        Ok(self)
    }

    pub fn with_overrides(&self, overrides: SettingsOverrides) -> Result<Self, ConfigError> {
        AnalysisSettings {
            model_name: overrides
                .model_name
                .map(|m| m.trim().to_string())
                .unwrap_or_else(|| self.model_name.clone()),
            weights: overrides.scoring_weights.unwrap_or(self.weights),
            stopwords: overrides
                .stopwords
                .map(|words| words.into_iter().map(|w| w.trim().to_lowercase()).collect())
                .unwrap_or_else(|| self.stopwords.clone()),
            keyword_limit: self.keyword_limit,
        }
        .validated()
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            weights: ScoringWeights::default(),
            stopwords: default_stopwords(),
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
        }
    }
}
