//! Error types for the parser

use thiserror::Error;

/// Errors that can occur while parsing or chunking a contract
///
/// Only the document-level variants (`DocumentNotFound`, `Source`, `UnsupportedFormat`,
/// `TextExtraction`) leave [`ContractParser`](crate::ContractParser); the rest are raised
/// and absorbed by the AI fallback paths.
#[derive(Error, Debug)]
pub enum ParserError {
    /// Document bytes are not available upstream
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Document source failed while fetching bytes
    #[error("Document source error: {0}")]
    Source(String),

    /// Content type the text extractor cannot decode
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Text extractor failed on a supported content type
    #[error("Text extraction error: {0}")]
    TextExtraction(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// LLM call exceeded the configured timeout
    #[error("LLM call timed out")]
    Timeout,

    /// LLM reply did not have the expected shape
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Rule-based pattern table could not be built
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ParserError {
    fn from(e: serde_json::Error) -> Self {
        ParserError::JsonParse(e.to_string())
    }
}

impl From<regex::Error> for ParserError {
    fn from(e: regex::Error) -> Self {
        ParserError::Pattern(e.to_string())
    }
}

impl ParserError {
    /// Whether this error aborts a whole parse or chunk operation
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ParserError::DocumentNotFound(_)
                | ParserError::Source(_)
                | ParserError::UnsupportedFormat(_)
                | ParserError::TextExtraction(_)
        )
    }
}
