//! Pactum Domain Layer
//!
//! Core value types and collaborator interfaces for the contract parsing pipeline.
//!
//! ## Key Concepts
//!
//! - **Chunk**: A contiguous slice of contract text with a structural type and derived annotations
//! - **Structural Type**: One of Header, Clause, Term, Condition, Signature, Other
//! - **Contract Metadata**: Document-level summary (title, parties, dates, value, key terms, type)
//! - **Section Info**: A `(number, title)` pair read from a numbered heading
//!
//! ## Architecture
//!
//! This crate holds no infrastructure:
//! - Plain data types with serde support
//! - Trait definitions for every external collaborator (generative text, document bytes,
//!   text extraction)
//! - Implementations live in `pactum-llm` and `pactum-parser`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod metadata;
pub mod traits;

// Re-exports for convenience
pub use chunk::{Chunk, ChunkId, SectionInfo, StructuralType};
pub use metadata::{ContractMetadata, ExtractionMethod};
pub use traits::{Document, DocumentSource, GenerationOptions, LlmProvider, TextExtractor};
