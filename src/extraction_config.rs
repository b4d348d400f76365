//! # Extraction Configuration Module
//!
//! Configuration structures for the extraction pipeline: the validator's
//! consistency heuristic, the text generation endpoint and the catalog seed.
//! Values come from `Default` and can be overridden through environment
//! variables (the binary loads a `.env` file first).

use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Constants for extraction configuration
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.75;
pub const DEFAULT_GENERATOR_URL: &str = "http://localhost:11434/v1/chat/completions";
pub const DEFAULT_GENERATOR_MODEL: &str = "llama3.1";
pub const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 120;

/// Tunables for the extraction validator
///
/// The match threshold drives a heuristic screen (last word of each ingredient
/// name found in the instructions). Passing it says the candidate is plausible,
/// not that it is correct.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Minimum fraction of ingredients that must be mentioned in the instructions
    pub match_threshold: f64,
    /// Reject candidates whose ingredient list is empty
    pub require_non_empty_ingredients: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            require_non_empty_ingredients: true,
        }
    }
}

impl ValidatorConfig {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            match_threshold: clamp_threshold(threshold),
            ..Default::default()
        }
    }
}

/// Connection settings for the text generation collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GENERATOR_URL.to_string(),
            model: DEFAULT_GENERATOR_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_GENERATOR_TIMEOUT_SECS,
        }
    }
}

/// Top-level configuration for a pipeline run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineConfig {
    pub validator: ValidatorConfig,
    pub generator: GeneratorConfig,
    /// JSON file used to seed the catalog
    pub catalog_seed_path: Option<PathBuf>,
}

impl PipelineConfig {
    /// Build a configuration from the process environment
    ///
    /// Recognised variables: `MATCH_THRESHOLD`, `GENERATOR_URL`,
    /// `GENERATOR_MODEL`, `GENERATOR_API_KEY`, `GENERATOR_TIMEOUT_SECS`,
    /// `CATALOG_SEED_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup; unparseable values keep their default
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = PipelineConfig::default();

        if let Some(threshold) = parse_var::<f64, _>(&lookup, "MATCH_THRESHOLD") {
            config.validator.match_threshold = clamp_threshold(threshold);
        }
        if let Some(endpoint) = non_empty(&lookup, "GENERATOR_URL") {
            config.generator.endpoint = endpoint;
        }
        if let Some(model) = non_empty(&lookup, "GENERATOR_MODEL") {
            config.generator.model = model;
        }
        config.generator.api_key = non_empty(&lookup, "GENERATOR_API_KEY");
        if let Some(timeout) = parse_var::<u64, _>(&lookup, "GENERATOR_TIMEOUT_SECS") {
            config.generator.timeout_secs = timeout;
        }
        config.catalog_seed_path = non_empty(&lookup, "CATALOG_SEED_PATH").map(PathBuf::from);

        config
    }
}

fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        return DEFAULT_MATCH_THRESHOLD;
    }
    threshold.clamp(0.0, 1.0)
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = non_empty(lookup, key)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {key}: '{raw}'");
            None
        }
    }
}
