//! Pactum Parser
//!
//! Turns contract text into typed chunks and document-level metadata.
//!
//! # Overview
//!
//! Every stage that can use a generative model has a deterministic fallback, so a missing,
//! failing or slow model only lowers the quality of the result. The only errors that reach
//! the caller are document-level ones: the document does not exist, the source failed, or
//! its content type cannot be decoded.
//!
//! # Architecture
//!
//! ```text
//! Text → SegmentationEngine → ChunkClassifier (per chunk) → ChunkAssembler → Chunk[]
//!      └→ MetadataExtractor (AI, else rules) → ContractMetadata
//! ```
//!
//! # Key Features
//!
//! - **Cascading segmentation**: numbered sections, then paragraphs, then fixed windows
//! - **Bounded concurrent classification**: results always in chunk order
//! - **Rule-based metadata fallback**: title, parties, dates, value, currency, key terms
//! - **Char-based offsets**: contiguous, independent of classification outcome
//!
//! # Example Usage
//!
//! ```no_run
//! use pactum_parser::{shared, ContractParser, InMemoryDocumentSource, ParserConfig, PlainTextExtractor};
//! use pactum_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = InMemoryDocumentSource::new();
//! source.insert_text("offer-17", "EMPLOYMENT AGREEMENT\n\nEMPLOYER: Acme Inc.\nEMPLOYEE: Jane Doe");
//!
//! let llm = shared(MockProvider::new("header"));
//! let parser = ContractParser::new(source, PlainTextExtractor, ParserConfig::default(), Some(llm))?;
//!
//! let processed = parser.process("offer-17").await?;
//! println!("{} chunks, title {:?}", processed.chunks.len(), processed.metadata.title);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod ai;
mod assemble;
mod classify;
mod config;
mod error;
pub mod metadata;
mod pipeline;
mod prompt;
mod response;
mod segment;
mod source;

#[cfg(test)]
mod tests;

pub use ai::{shared, SharedProvider};
pub use assemble::{parse_section_heading, ChunkAssembler, DEFAULT_PROCESSING_METHOD};
pub use classify::{heuristic_type, ChunkClassifier};
pub use config::{ClassifierFallback, ParserConfig};
pub use error::ParserError;
pub use metadata::{KeyTermDomain, MetadataExtractor};
pub use pipeline::{ContractParser, ProcessedDocument};
pub use prompt::{ClassificationPrompt, MetadataPrompt};
pub use response::{decode_label, parse_metadata_response};
pub use segment::{Segmentation, SegmentationEngine, SplitStrategy};
pub use source::{
    content_type_for, DecodeError, FsDocumentSource, InMemoryDocumentSource, PlainTextExtractor,
    OCTET_STREAM, TEXT_PLAIN,
};
