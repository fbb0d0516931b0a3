//! Configuration for the parser

use pactum_domain::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the chunk classifier does when no AI answer is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierFallback {
    /// Every unanswered chunk is `Other`
    Other,
    /// Deterministic keyword heuristics
    Heuristic,
}

impl Default for ClassifierFallback {
    fn default() -> Self {
        ClassifierFallback::Other
    }
}

/// Configuration for segmentation, classification and metadata extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Target maximum chunk size (characters)
    pub max_chunk_size: usize,

    /// Minimum chunk size (characters); smaller sections are merged forward
    pub min_chunk_size: usize,

    /// Characters of a chunk sent to the classifier
    pub classification_prefix_chars: usize,

    /// Sampling temperature for classification
    pub classification_temperature: f32,

    /// Token limit for the classification reply
    pub classification_max_tokens: u32,

    /// Characters of the document sent for metadata extraction
    pub metadata_prefix_chars: usize,

    /// How far back from the prefix cap to look for a paragraph break
    pub paragraph_backoff_chars: usize,

    /// Sampling temperature for metadata extraction
    pub metadata_temperature: f32,

    /// Token limit for the metadata reply
    pub metadata_max_tokens: u32,

    /// Timeout for a single LLM call (milliseconds)
    pub ai_timeout_ms: u64,

    /// Maximum classification calls in flight
    pub classification_concurrency: usize,

    /// Classifier behaviour without an AI answer
    pub classifier_fallback: ClassifierFallback,
}

impl ParserConfig {
    /// Get the LLM call timeout as a Duration
    pub fn ai_timeout(&self) -> Duration {
        Duration::from_millis(self.ai_timeout_ms)
    }

    /// Generation options for chunk classification
    pub fn classification_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.classification_temperature,
            max_tokens: self.classification_max_tokens,
        }
    }

    /// Generation options for metadata extraction
    pub fn metadata_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.metadata_temperature,
            max_tokens: self.metadata_max_tokens,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_size == 0 {
            return Err("max_chunk_size must be greater than 0".to_string());
        }
        if self.min_chunk_size >= self.max_chunk_size {
            return Err("min_chunk_size must be smaller than max_chunk_size".to_string());
        }
        if self.classification_prefix_chars == 0 {
            return Err("classification_prefix_chars must be greater than 0".to_string());
        }
        if self.metadata_prefix_chars == 0 {
            return Err("metadata_prefix_chars must be greater than 0".to_string());
        }
        if self.paragraph_backoff_chars > self.metadata_prefix_chars {
            return Err("paragraph_backoff_chars cannot exceed metadata_prefix_chars".to_string());
        }
        if !(0.0..=2.0).contains(&self.classification_temperature)
            || !(0.0..=2.0).contains(&self.metadata_temperature)
        {
            return Err("temperatures must be within [0.0, 2.0]".to_string());
        }
        if self.ai_timeout_ms == 0 {
            return Err("ai_timeout_ms must be greater than 0".to_string());
        }
        if self.classification_concurrency == 0 {
            return Err("classification_concurrency must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ParserConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_chunk_size: 700,
            min_chunk_size: 100,
            classification_prefix_chars: 800,
            classification_temperature: 0.0,
            classification_max_tokens: 10,
            metadata_prefix_chars: 20_000,
            paragraph_backoff_chars: 500,
            metadata_temperature: 0.1,
            metadata_max_tokens: 2_000,
            ai_timeout_ms: 30_000,
            classification_concurrency: 4,
            classifier_fallback: ClassifierFallback::Other,
        }
    }
}

impl ParserConfig {
    /// Aggressive preset: smaller prompts and short timeouts for faster processing
    pub fn aggressive() -> Self {
        Self {
            max_chunk_size: 500,
            min_chunk_size: 80,
            classification_prefix_chars: 400,
            metadata_prefix_chars: 15_000,
            ai_timeout_ms: 10_000,
            classification_concurrency: 8,
            ..Self::default()
        }
    }

    /// Lenient preset: larger chunks and prompts, long timeouts for better quality
    pub fn lenient() -> Self {
        Self {
            max_chunk_size: 1_000,
            min_chunk_size: 150,
            classification_prefix_chars: 1_200,
            metadata_prefix_chars: 25_000,
            metadata_max_tokens: 3_000,
            ai_timeout_ms: 120_000,
            classification_concurrency: 2,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ParserConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ParserConfig::aggressive().validate().is_ok());
        assert!(ParserConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_min_must_be_below_max() {
        let config = ParserConfig {
            min_chunk_size: 700,
            ..ParserConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = ParserConfig {
            classification_concurrency: 0,
            ..ParserConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = ParserConfig::from_toml(
            "max_chunk_size = 900\nclassifier_fallback = \"heuristic\"\n",
        )
        .unwrap();

        assert_eq!(config.max_chunk_size, 900);
        assert_eq!(config.min_chunk_size, 100);
        assert_eq!(config.classifier_fallback, ClassifierFallback::Heuristic);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ParserConfig::lenient();
        let parsed = ParserConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_generation_options() {
        let config = ParserConfig::default();
        assert_eq!(config.classification_options().max_tokens, 10);
        assert_eq!(config.metadata_options().temperature, 0.1);
        assert_eq!(config.ai_timeout(), Duration::from_secs(30));
    }
}
