//! Document sources and text extraction
//!
//! Binary formats (PDF, Word) are recognised by content type but not decoded here; the
//! [`PlainTextExtractor`] reports them as unsupported.

use pactum_domain::{Document, DocumentSource, TextExtractor};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Content type for plain text documents
pub const TEXT_PLAIN: &str = "text/plain";

/// Content type reported for files with an unknown extension
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type inferred from a file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("txt" | "text" | "md") => TEXT_PLAIN,
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => OCTET_STREAM,
    }
}

/// Documents stored as files under one root directory
///
/// The document id is a file name relative to the root. Ids that would escape the root
/// (`..`, path separators, absolute paths) are rejected.
#[derive(Debug, Clone)]
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    /// Create a source reading from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, document_id: &str) -> io::Result<PathBuf> {
        let invalid = document_id.is_empty()
            || document_id == "."
            || document_id.contains("..")
            || document_id.contains(['/', '\\'])
            || Path::new(document_id).is_absolute();

        if invalid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid document id: {:?}", document_id),
            ));
        }

        Ok(self.root.join(document_id))
    }
}

impl DocumentSource for FsDocumentSource {
    type Error = io::Error;

    fn get_document(&self, document_id: &str) -> Result<Option<Document>, Self::Error> {
        let path = self.resolve(document_id)?;
        match fs::read(&path) {
            Ok(bytes) => {
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(Some(Document {
                    bytes,
                    content_type: content_type_for(&path).to_string(),
                }))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Documents held in memory, keyed by id
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentSource {
    documents: HashMap<String, Document>,
}

impl InMemoryDocumentSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document under `document_id`, replacing any previous one
    pub fn insert(&mut self, document_id: impl Into<String>, document: Document) {
        self.documents.insert(document_id.into(), document);
    }

    /// Store plain text under `document_id`
    pub fn insert_text(&mut self, document_id: impl Into<String>, text: &str) {
        self.insert(
            document_id,
            Document {
                bytes: text.as_bytes().to_vec(),
                content_type: TEXT_PLAIN.to_string(),
            },
        );
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no documents are stored
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for InMemoryDocumentSource {
    type Error = Infallible;

    fn get_document(&self, document_id: &str) -> Result<Option<Document>, Self::Error> {
        Ok(self.documents.get(document_id).cloned())
    }
}

/// Errors from decoding document bytes
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Content type is not handled by this extractor
    #[error("Unsupported content type: {0}")]
    Unsupported(String),

    /// Bytes are not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Decodes `text/plain` documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    type Error = DecodeError;

    fn supports(&self, content_type: &str) -> bool {
        content_type
            .split(';')
            .next()
            .is_some_and(|base| base.trim().eq_ignore_ascii_case(TEXT_PLAIN))
    }

    fn extract_text(&self, document: &Document) -> Result<String, Self::Error> {
        if !self.supports(&document.content_type) {
            return Err(DecodeError::Unsupported(document.content_type.clone()));
        }

        let text = String::from_utf8(document.bytes.clone())?;
        Ok(text
            .strip_prefix('\u{FEFF}')
            .map(str::to_string)
            .unwrap_or(text))
    }
}
