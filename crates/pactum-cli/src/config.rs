//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use pactum_llm::OllamaProvider;
use pactum_parser::{shared, ClassifierFallback, ParserConfig, SharedProvider};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Generative provider selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Ollama model; `None` disables AI
    pub model: Option<String>,

    /// Ollama endpoint
    pub ollama_url: String,
}

/// Effective CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Parser settings
    pub parser: ParserConfig,

    /// Provider settings
    pub provider: ProviderSettings,
}

impl Config {
    /// Build the configuration from an optional TOML file and the provider flags.
    pub fn load(path: Option<&Path>, provider: ProviderSettings) -> Result<Self> {
        let parser = match path {
            Some(path) => Self::read_parser_config(path)?,
            None => ParserConfig::default(),
        };

        parser.validate().map_err(CliError::Config)?;
        Ok(Self { parser, provider })
    }

    /// Read a parser configuration file; missing keys take their defaults.
    pub fn read_parser_config(path: &Path) -> Result<ParserConfig> {
        let contents = fs::read_to_string(path)?;
        let config = ParserConfig::from_toml(&contents)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded parser configuration from {}", path.display());
        Ok(config)
    }

    /// Switch the classifier to keyword heuristics when no model answers.
    pub fn use_heuristic_fallback(&mut self) {
        self.parser.classifier_fallback = ClassifierFallback::Heuristic;
    }

    /// The configured provider, if a model was named.
    pub fn llm(&self) -> Option<SharedProvider> {
        let model = self.provider.model.as_deref()?.trim();
        if model.is_empty() {
            return None;
        }

        let provider = OllamaProvider::new(&self.provider.ollama_url, model)
            .with_timeout(self.parser.ai_timeout());
        Some(shared(provider))
    }
}
