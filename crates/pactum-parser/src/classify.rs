//! Structural classification of chunk texts
//!
//! Each chunk is classified on its own. With a provider configured the first
//! `classification_prefix_chars` characters go to the LLM and the reply is decoded into a
//! [`StructuralType`]. A missing provider, an error, a timeout or an unrecognised reply all
//! resolve to the configured fallback: `Other`, or the keyword heuristic in
//! [`heuristic_type`].

use crate::ai::{call_llm, truncate_for_log, SharedProvider};
use crate::config::{ClassifierFallback, ParserConfig};
use crate::prompt::ClassificationPrompt;
use crate::response::decode_label;
use once_cell::sync::Lazy;
use pactum_domain::StructuralType;
use regex::Regex;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

static SIGNATURE_CUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)\bin\s+witness\s+whereof\b|^[ \t]*(?:by|signature|signed)[ \t]*:|\backnowledged\s+and\s+(?:agreed|accepted)\b|_{4,}")
        .expect("Invalid signature cue pattern")
});

static HEADER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Z0-9][A-Z0-9 &,.'\-]*\b(?:AGREEMENT|CONTRACT)\b.*|(?:EMPLOYER|EMPLOYEE|CLIENT|DEVELOPER|SERVICE PROVIDER|PROVIDER|CONTRACTOR|VENDOR|CONSULTANT|LICENSOR|LICENSEE)[ \t]*:.*|\d+\.[ \t]+[A-Z][A-Z0-9 &,;:'()/.\-]*)$")
        .expect("Invalid header cue pattern")
});

static TERM_CUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:shall\s+mean|means|is\s+defined\s+as|defined\s+as)\b")
        .expect("Invalid term cue pattern")
});

static CONDITION_CUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:if|unless|provided\s+that|in\s+the\s+event|either\s+party\s+may)\b")
        .expect("Invalid condition cue pattern")
});

static CLAUSE_CUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:shall|will|agrees?\s+to|must)\b").expect("Invalid clause cue pattern")
});

/// Headings followed by at most this many words still count as a header chunk
const HEADER_BODY_WORDS: usize = 25;

/// Assigns one [`StructuralType`] to each chunk text
#[derive(Clone)]
pub struct ChunkClassifier {
    llm: Option<SharedProvider>,
    config: ParserConfig,
}

impl ChunkClassifier {
    /// Create a classifier; `None` disables the AI path
    ///
    /// A concurrency of zero is raised to one.
    pub fn new(llm: Option<SharedProvider>, mut config: ParserConfig) -> Self {
        config.classification_concurrency = config.classification_concurrency.max(1);
        Self { llm, config }
    }

    /// Whether the AI path is configured
    pub fn is_ai_available(&self) -> bool {
        self.llm.is_some()
    }

    /// Classify one chunk, never failing
    pub async fn classify(&self, chunk: &str) -> StructuralType {
        self.classify_with_permit(chunk, None).await
    }

    async fn classify_with_permit(
        &self,
        chunk: &str,
        permit: Option<OwnedSemaphorePermit>,
    ) -> StructuralType {
        let Some(llm) = &self.llm else {
            return self.fallback(chunk);
        };

        let prompt = ClassificationPrompt::new(chunk)
            .with_prefix_chars(self.config.classification_prefix_chars)
            .build();

        match call_llm(
            llm,
            prompt,
            self.config.classification_options(),
            self.config.ai_timeout(),
            permit,
        )
        .await
        {
            Ok(reply) => match decode_label(&reply) {
                Some(chunk_type) => chunk_type,
                None => {
                    warn!("Unrecognised classification reply: {:?}", truncate_for_log(&reply));
                    self.fallback(chunk)
                }
            },
            Err(e) => {
                warn!("Chunk classification failed: {}", e);
                self.fallback(chunk)
            }
        }
    }

    /// Classify every chunk, returning types in chunk order
    ///
    /// At most `classification_concurrency` provider calls are in flight, counting calls that
    /// already timed out but have not returned. A failed task only affects its own chunk.
    pub async fn classify_all(&self, chunks: &[String]) -> Vec<StructuralType> {
        if self.llm.is_none() {
            debug!("No LLM provider configured, using {:?} fallback for {} chunks", self.config.classifier_fallback, chunks.len());
            return chunks.iter().map(|chunk| self.fallback(chunk)).collect();
        }

        let permits = Arc::new(Semaphore::new(self.config.classification_concurrency));
        let handles: Vec<_> = chunks
            .iter()
            .map(|chunk| {
                let classifier = self.clone();
                let permits = Arc::clone(&permits);
                let chunk = chunk.clone();
                tokio::spawn(async move {
                    let permit = permits.acquire_owned().await.ok();
                    classifier.classify_with_permit(&chunk, permit).await
                })
            })
            .collect();

        let mut types = Vec::with_capacity(chunks.len());
        for (handle, chunk) in handles.into_iter().zip(chunks) {
            match handle.await {
                Ok(chunk_type) => types.push(chunk_type),
                Err(e) => {
                    warn!("Classification task failed: {}", e);
                    types.push(self.fallback(chunk));
                }
            }
        }

        debug!("Classified {} chunks", types.len());
        types
    }

    fn fallback(&self, chunk: &str) -> StructuralType {
        match self.config.classifier_fallback {
            ClassifierFallback::Other => StructuralType::Other,
            ClassifierFallback::Heuristic => heuristic_type(chunk),
        }
    }
}

/// Keyword-based structural type, used when no AI answer is available and the heuristic
/// fallback is enabled
pub fn heuristic_type(chunk: &str) -> StructuralType {
    let text = chunk.trim();
    if text.is_empty() {
        return StructuralType::Other;
    }

    if SIGNATURE_CUES.is_match(text) {
        return StructuralType::Signature;
    }

    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default().trim();
    let body_words: usize = lines.map(|line| line.split_whitespace().count()).sum();
    if HEADER_LINE.is_match(first) && body_words <= HEADER_BODY_WORDS {
        return StructuralType::Header;
    }

    if TERM_CUES.is_match(text) {
        StructuralType::Term
    } else if CONDITION_CUES.is_match(text) {
        StructuralType::Condition
    } else if CLAUSE_CUES.is_match(text) {
        StructuralType::Clause
    } else {
        StructuralType::Other
    }
}
