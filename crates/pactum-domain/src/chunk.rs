//! Chunk module - ordered, typed slices of a contract

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Unique identifier for a chunk based on UUIDv7
///
/// UUIDv7 keeps identifiers created within one chunking call sortable by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ChunkId(u128);

impl ChunkId {
    /// Generate a new UUIDv7-based ChunkId
    ///
    /// # Examples
    ///
    /// ```
    /// use pactum_domain::ChunkId;
    ///
    /// let id = ChunkId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Parse a ChunkId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use pactum_domain::ChunkId;
    ///
    /// let id = ChunkId::new();
    /// let parsed = ChunkId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid chunk id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ChunkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl From<ChunkId> for String {
    fn from(id: ChunkId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ChunkId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_string(&value)
    }
}

/// Structural role of a chunk within a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralType {
    /// Title blocks, party blocks, numbered section headings
    Header,

    /// Obligations and operative provisions
    Clause,

    /// Definitions and defined terms
    Term,

    /// Conditional provisions (if / unless / either party may)
    Condition,

    /// Signature blocks and acknowledgements
    Signature,

    /// Anything that could not be classified
    Other,
}

impl StructuralType {
    /// All structural types, in declaration order
    pub const ALL: [StructuralType; 6] = [
        StructuralType::Header,
        StructuralType::Clause,
        StructuralType::Term,
        StructuralType::Condition,
        StructuralType::Signature,
        StructuralType::Other,
    ];

    /// Get the label as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            StructuralType::Header => "header",
            StructuralType::Clause => "clause",
            StructuralType::Term => "term",
            StructuralType::Condition => "condition",
            StructuralType::Signature => "signature",
            StructuralType::Other => "other",
        }
    }

    /// Parse a label (case-insensitive)
    ///
    /// Only the five classifiable labels are accepted; `other` is the caller's default,
    /// never something a classifier reports.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "header" => Some(StructuralType::Header),
            "clause" => Some(StructuralType::Clause),
            "term" => Some(StructuralType::Term),
            "condition" => Some(StructuralType::Condition),
            "signature" => Some(StructuralType::Signature),
            _ => None,
        }
    }
}

impl fmt::Display for StructuralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numbered heading found at the start of a chunk, e.g. `4. BONUS AND EQUITY`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    /// Section number
    pub number: u32,

    /// Section title as written
    pub title: String,
}

/// A chunk of contract text
///
/// Chunks are created once per chunking call and never updated; re-chunking a document
/// produces a fresh set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Unique identifier
    pub id: ChunkId,

    /// Document this chunk belongs to
    pub document_id: String,

    /// Chunk text
    pub content: String,

    /// Position within the document, starting at 0
    pub index: usize,

    /// Start offset in characters
    pub start_offset: usize,

    /// End offset in characters (`start_offset + content length`)
    pub end_offset: usize,

    /// Structural type
    #[serde(rename = "type")]
    pub chunk_type: StructuralType,

    /// Derived annotations (counts, preview, detected heading, timestamps)
    pub metadata: Map<String, Value>,
}

impl Chunk {
    /// Length of the content in characters
    pub fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// Section heading recorded in metadata, if one was detected
    pub fn section(&self) -> Option<SectionInfo> {
        let number = self.metadata.get("sectionNumber")?.as_u64()?;
        let title = self.metadata.get("sectionTitle")?.as_str()?;
        Some(SectionInfo {
            number: u32::try_from(number).ok()?,
            title: title.to_string(),
        })
    }
}
