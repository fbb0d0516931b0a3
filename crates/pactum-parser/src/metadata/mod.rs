//! Document-level metadata extraction
//!
//! The AI path sends a bounded prefix of the contract with an extraction rubric and decodes
//! the JSON reply. Any failure on that path (no provider, provider error, timeout, empty,
//! unparsable or field-less reply) falls back to the rule-based extractors in [`rules`]. If
//! the rule tables themselves are unusable the result is an all-empty record.

mod patterns;
pub mod rules;

pub use patterns::KeyTermDomain;

use crate::ai::{call_llm, truncate_for_log, SharedProvider};
use crate::config::ParserConfig;
use crate::error::ParserError;
use crate::prompt::MetadataPrompt;
use crate::response::parse_metadata_response;
use pactum_domain::{ContractMetadata, ExtractionMethod};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Derives one [`ContractMetadata`] record from full contract text
#[derive(Clone)]
pub struct MetadataExtractor {
    llm: Option<SharedProvider>,
    config: ParserConfig,
}

impl MetadataExtractor {
    /// Create an extractor; `None` disables the AI path
    ///
    /// A zero prefix cap or timeout is raised to one, and the paragraph back-off never exceeds
    /// the prefix cap.
    pub fn new(llm: Option<SharedProvider>, mut config: ParserConfig) -> Self {
        config.metadata_prefix_chars = config.metadata_prefix_chars.max(1);
        config.paragraph_backoff_chars = config
            .paragraph_backoff_chars
            .min(config.metadata_prefix_chars);
        config.ai_timeout_ms = config.ai_timeout_ms.max(1);
        Self { llm, config }
    }

    /// Whether the AI path is configured
    pub fn is_ai_available(&self) -> bool {
        self.llm.is_some()
    }

    /// Extract metadata, never failing
    pub async fn extract(&self, text: &str) -> ContractMetadata {
        match &self.llm {
            Some(llm) => match self.extract_with_ai(llm, text).await {
                Ok(metadata) => {
                    info!(
                        "AI metadata extraction succeeded ({} parties, {} key terms)",
                        metadata.parties.len(),
                        metadata.key_terms.len()
                    );
                    return metadata;
                }
                Err(e) => warn!("AI metadata extraction failed, using rule-based fallback: {}", e),
            },
            None => debug!("No LLM provider configured, using rule-based metadata extraction"),
        }

        self.extract_rule_based(text)
    }

    /// Run only the rule-based extractors
    pub fn extract_rule_based(&self, text: &str) -> ContractMetadata {
        match rules::extract(text) {
            Ok(metadata) => {
                debug!(
                    "Rule-based extraction found title={:?}, {} parties, value={:?}",
                    metadata.title,
                    metadata.parties.len(),
                    metadata.contract_value
                );
                metadata
            }
            Err(e) => {
                warn!("Rule-based metadata extraction failed, returning empty record: {}", e);
                ContractMetadata::empty(ExtractionMethod::RuleBased)
            }
        }
    }

    async fn extract_with_ai(
        &self,
        llm: &SharedProvider,
        text: &str,
    ) -> Result<ContractMetadata, ParserError> {
        let prompt = MetadataPrompt::new(text)
            .with_limits(
                self.config.metadata_prefix_chars,
                self.config.paragraph_backoff_chars,
            )
            .build();

        let reply = call_llm(
            llm,
            prompt,
            self.config.metadata_options(),
            self.config.ai_timeout(),
            None,
        )
        .await?;

        let mut metadata = parse_metadata_response(&reply).inspect_err(|e| {
            warn!("Unusable metadata reply ({}): {}", e, truncate_for_log(&reply));
        })?;

        if metadata.is_blank() {
            warn!("Metadata reply carried no fields: {}", truncate_for_log(&reply));
            return Err(ParserError::InvalidFormat("reply carried no fields".to_string()));
        }

        metadata
            .custom_fields
            .insert("model".into(), Value::from(llm.model_name()));
        Ok(metadata)
    }
}
