//! Assembly of final chunk records from segmentation output and classifications

use chrono::Utc;
use once_cell::sync::Lazy;
use pactum_domain::{Chunk, ChunkId, SectionInfo, StructuralType};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

static LEADING_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(\d+)\.[ \t]+([A-Z][A-Z0-9 \t&,;:'()/.\-]*?)[ \t]*(?:\r?\n|$)")
        .expect("Invalid leading heading pattern")
});

const PREVIEW_CHARS: usize = 50;

/// Tag recorded as `processingMethod` on every chunk
pub const DEFAULT_PROCESSING_METHOD: &str = "semantic-chunking";

/// Builds [`Chunk`] records with offsets and derived annotations
#[derive(Debug, Clone)]
pub struct ChunkAssembler {
    processing_method: String,
}

impl ChunkAssembler {
    /// Create an assembler that stamps `processing_method` on every chunk
    pub fn new(processing_method: impl Into<String>) -> Self {
        Self {
            processing_method: processing_method.into(),
        }
    }

    /// Combine chunk texts with their classifications
    ///
    /// Offsets are counted in characters from 0, each chunk starting where the previous one
    /// ended. A chunk without a classification is typed `Other`. All chunks of one call share
    /// the same `createdAt` timestamp.
    pub fn assemble(
        &self,
        chunk_texts: &[String],
        classifications: &[StructuralType],
        document_id: &str,
    ) -> Vec<Chunk> {
        if chunk_texts.len() != classifications.len() {
            warn!(
                "Got {} classifications for {} chunks",
                classifications.len(),
                chunk_texts.len()
            );
        }

        let created_at = Utc::now().to_rfc3339();
        let mut cursor = 0;

        let chunks: Vec<Chunk> = chunk_texts
            .iter()
            .enumerate()
            .map(|(index, content)| {
                let chunk_type = classifications
                    .get(index)
                    .copied()
                    .unwrap_or(StructuralType::Other);
                let char_count = content.chars().count();
                let start_offset = cursor;
                cursor += char_count;

                Chunk {
                    id: ChunkId::new(),
                    document_id: document_id.to_string(),
                    content: content.clone(),
                    index,
                    start_offset,
                    end_offset: cursor,
                    chunk_type,
                    metadata: self.annotations(content, chunk_type, char_count, &created_at),
                }
            })
            .collect();

        debug!("Assembled {} chunks for document {}", chunks.len(), document_id);
        chunks
    }

    fn annotations(
        &self,
        content: &str,
        chunk_type: StructuralType,
        char_count: usize,
        created_at: &str,
    ) -> Map<String, Value> {
        let mut metadata = Map::new();
        metadata.insert("chunkType".into(), Value::from(chunk_type.as_str()));
        metadata.insert("charCount".into(), Value::from(char_count));
        metadata.insert("createdAt".into(), Value::from(created_at));
        metadata.insert(
            "processingMethod".into(),
            Value::from(self.processing_method.as_str()),
        );
        metadata.insert(
            "wordCount".into(),
            Value::from(content.split_whitespace().count()),
        );
        metadata.insert("preview".into(), Value::from(preview(content)));

        match parse_section_heading(content) {
            Some(section) => {
                metadata.insert("hasSectionNumber".into(), Value::Bool(true));
                metadata.insert("sectionNumber".into(), Value::from(section.number));
                metadata.insert("sectionTitle".into(), Value::from(section.title));
            }
            None => {
                metadata.insert("hasSectionNumber".into(), Value::Bool(false));
            }
        }

        metadata
    }
}

impl Default for ChunkAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_PROCESSING_METHOD)
    }
}

/// Read a `<n>. <UPPERCASE TITLE>` heading at the very start of a chunk
///
/// # Examples
///
/// ```
/// use pactum_parser::parse_section_heading;
///
/// let section = parse_section_heading("4. BONUS AND EQUITY\nStock Options: 5,000 shares").unwrap();
/// assert_eq!(section.number, 4);
/// assert_eq!(section.title, "BONUS AND EQUITY");
/// assert!(parse_section_heading("Stock Options: 5,000 shares").is_none());
/// ```
pub fn parse_section_heading(text: &str) -> Option<SectionInfo> {
    let caps = LEADING_HEADING.captures(text)?;
    let number = caps.get(1)?.as_str().parse().ok()?;
    let title = caps.get(2)?.as_str().trim().to_string();
    Some(SectionInfo { number, title })
}

/// One-line preview, cut at 50 characters with a trailing ellipsis
fn preview(content: &str) -> String {
    let single_line = content.replace("\r\n", " ").replace(['\n', '\r'], " ");
    match single_line.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &single_line[..idx]),
        None => single_line,
    }
}
