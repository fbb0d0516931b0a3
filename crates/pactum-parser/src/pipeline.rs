//! The contract parsing pipeline
//!
//! ```text
//! DocumentSource → TextExtractor → SegmentationEngine → ChunkClassifier → ChunkAssembler → Chunk[]
//!                                └→ MetadataExtractor → ContractMetadata
//! ```

use crate::ai::SharedProvider;
use crate::assemble::ChunkAssembler;
use crate::classify::ChunkClassifier;
use crate::config::ParserConfig;
use crate::error::ParserError;
use crate::metadata::MetadataExtractor;
use crate::segment::{SegmentationEngine, SplitStrategy};
use pactum_domain::{Chunk, ContractMetadata, DocumentSource, TextExtractor};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, info};

/// Metadata and chunks for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDocument {
    /// Document id
    pub document_id: String,

    /// Segmentation strategy that produced the chunks
    pub strategy: SplitStrategy,

    /// Document-level metadata
    pub metadata: ContractMetadata,

    /// Chunks in document order
    pub chunks: Vec<Chunk>,
}

/// Parses contracts into metadata and typed chunks
///
/// The AI capability is fixed at construction: pass `None` for the provider to run every
/// stage on its deterministic fallback.
pub struct ContractParser<S, X> {
    source: S,
    extractor: X,
    segmenter: SegmentationEngine,
    classifier: ChunkClassifier,
    metadata_extractor: MetadataExtractor,
    assembler: ChunkAssembler,
}

impl<S, X> ContractParser<S, X>
where
    S: DocumentSource,
    S::Error: Display,
    X: TextExtractor,
    X::Error: Display,
{
    /// Create a new parser
    pub fn new(
        source: S,
        extractor: X,
        config: ParserConfig,
        llm: Option<SharedProvider>,
    ) -> Result<Self, ParserError> {
        config.validate().map_err(ParserError::Config)?;

        info!(
            "Contract parser ready (AI {})",
            if llm.is_some() { "enabled" } else { "disabled" }
        );

        Ok(Self {
            source,
            extractor,
            segmenter: SegmentationEngine::from_config(&config),
            classifier: ChunkClassifier::new(llm.clone(), config.clone()),
            metadata_extractor: MetadataExtractor::new(llm, config),
            assembler: ChunkAssembler::default(),
        })
    }

    /// Replace the chunk assembler, e.g. to change the processing method tag
    pub fn with_assembler(mut self, assembler: ChunkAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Whether a generative provider was configured
    pub fn is_ai_available(&self) -> bool {
        self.classifier.is_ai_available()
    }

    /// Extract metadata for a stored document
    pub async fn parse(&self, document_id: &str) -> Result<ContractMetadata, ParserError> {
        let text = self.load_text(document_id)?;
        Ok(self.extract_metadata(&text).await)
    }

    /// Chunk a stored document
    pub async fn chunk(&self, document_id: &str) -> Result<Vec<Chunk>, ParserError> {
        let text = self.load_text(document_id)?;
        Ok(self.chunk_text(document_id, &text).await)
    }

    /// Extract metadata and chunks for a stored document concurrently
    pub async fn process(&self, document_id: &str) -> Result<ProcessedDocument, ParserError> {
        let text = self.load_text(document_id)?;

        let (metadata, (strategy, chunks)) = tokio::join!(
            self.extract_metadata(&text),
            self.chunk_text_with_strategy(document_id, &text)
        );

        Ok(ProcessedDocument {
            document_id: document_id.to_string(),
            strategy,
            metadata,
            chunks,
        })
    }

    /// Extract metadata from already decoded text
    pub async fn extract_metadata(&self, text: &str) -> ContractMetadata {
        self.metadata_extractor.extract(text).await
    }

    /// Chunk already decoded text
    pub async fn chunk_text(&self, document_id: &str, text: &str) -> Vec<Chunk> {
        self.chunk_text_with_strategy(document_id, text).await.1
    }

    /// Chunk already decoded text and report the segmentation strategy
    pub async fn chunk_text_with_strategy(
        &self,
        document_id: &str,
        text: &str,
    ) -> (SplitStrategy, Vec<Chunk>) {
        let segmentation = self.segmenter.segment_with_strategy(text);
        let classifications = self.classifier.classify_all(&segmentation.chunks).await;
        let chunks = self
            .assembler
            .assemble(&segmentation.chunks, &classifications, document_id);

        info!(
            "Chunked document {} into {} chunks ({})",
            document_id,
            chunks.len(),
            segmentation.strategy
        );
        (segmentation.strategy, chunks)
    }

    fn load_text(&self, document_id: &str) -> Result<String, ParserError> {
        let document = self
            .source
            .get_document(document_id)
            .map_err(|e| ParserError::Source(e.to_string()))?
            .ok_or_else(|| ParserError::DocumentNotFound(document_id.to_string()))?;

        if !self.extractor.supports(&document.content_type) {
            return Err(ParserError::UnsupportedFormat(document.content_type));
        }

        let text = self
            .extractor
            .extract_text(&document)
            .map_err(|e| ParserError::TextExtraction(e.to_string()))?;

        debug!("Loaded document {} ({} chars)", document_id, text.chars().count());
        Ok(text)
    }
}
