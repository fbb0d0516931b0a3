//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the parsing pipeline and infrastructure.
//! Implementations live in other crates.

/// Sampling options passed to a generative text provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature (0.0 is as deterministic as the provider allows)
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 1024,
        }
    }
}

/// Trait for generative text providers
///
/// Implemented by the infrastructure layer (pactum-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for the prompt
    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, Self::Error>;

    /// Name of the model behind this provider
    fn model_name(&self) -> &str;
}

/// Raw document bytes as stored upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File contents
    pub bytes: Vec<u8>,

    /// MIME type, e.g. `text/plain` or `application/pdf`
    pub content_type: String,
}

/// Trait for fetching document bytes
///
/// Implemented by the infrastructure layer (pactum-parser ships file-system and in-memory sources)
pub trait DocumentSource {
    /// Error type for source operations
    type Error;

    /// Fetch a document; `Ok(None)` means the document does not exist
    fn get_document(&self, document_id: &str) -> Result<Option<Document>, Self::Error>;
}

/// Trait for decoding document bytes into plain text
pub trait TextExtractor {
    /// Error type for extraction operations
    type Error;

    /// Whether this extractor can decode the given content type
    fn supports(&self, content_type: &str) -> bool;

    /// Decode a document into text
    fn extract_text(&self, document: &Document) -> Result<String, Self::Error>;
}
