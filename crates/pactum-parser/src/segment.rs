//! Segmentation of contract text into ordered chunk texts
//!
//! Three strategies are tried in order and the first one that qualifies wins:
//!
//! 1. **Structural**: split before `<n>. <UPPERCASE TITLE>` lines when there are more than
//!    three sections, then split oversized sections on sentences and merge undersized ones
//!    forward.
//! 2. **Paragraph**: split on blank lines and pack paragraphs up to the size limit when there
//!    are more than two paragraphs.
//! 3. **Fixed size**: consecutive windows of exactly `max_size` characters.
//!
//! All work is done on byte ranges of the source text, so chunks only ever lose whitespace
//! at their own boundaries.

use crate::config::ParserConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use tracing::{debug, info};

static SECTION_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\d+\.[ \t]+[A-Z][A-Z0-9 \t&,;:'()/.\-]*\r?$")
        .expect("Invalid section heading pattern")
});

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("Invalid sentence pattern"));

static PARAGRAPH_BREAKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\n(?:[ \t]*\n)+", r"\r\n(?:[ \t]*\r\n)+", r"\r(?:[ \t]*\r)+"]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid paragraph break pattern"))
        .collect()
});

/// Strategy that produced a segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Blank input or input shorter than the minimum chunk size, returned whole
    Single,
    /// Numbered uppercase section headings
    Structural,
    /// Blank-line separated paragraphs
    Paragraph,
    /// Fixed-size character windows
    FixedSize,
}

impl SplitStrategy {
    /// Get the strategy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitStrategy::Single => "single",
            SplitStrategy::Structural => "structural",
            SplitStrategy::Paragraph => "paragraph",
            SplitStrategy::FixedSize => "fixed_size",
        }
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chunk texts together with the strategy that produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// Strategy that won the cascade
    pub strategy: SplitStrategy,
    /// Chunk texts in source order
    pub chunks: Vec<String>,
}

/// Splits full document text into ordered chunk texts
#[derive(Debug, Clone)]
pub struct SegmentationEngine {
    max_size: usize,
    min_size: usize,
}

impl SegmentationEngine {
    /// Create a new engine with explicit size bounds (characters)
    pub fn new(max_size: usize, min_size: usize) -> Self {
        Self {
            max_size: max_size.max(1),
            min_size,
        }
    }

    /// Create an engine from parser configuration
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(config.max_chunk_size, config.min_chunk_size)
    }

    /// Segment text into chunk texts
    pub fn segment(&self, text: &str) -> Vec<String> {
        self.segment_with_strategy(text).chunks
    }

    /// Segment text and report which strategy was used
    pub fn segment_with_strategy(&self, text: &str) -> Segmentation {
        if text.trim().is_empty() || text.chars().count() < self.min_size {
            return Segmentation {
                strategy: SplitStrategy::Single,
                chunks: vec![text.trim().to_string()],
            };
        }

        let (strategy, ranges) = if let Some(ranges) = self.split_structural(text) {
            (SplitStrategy::Structural, ranges)
        } else if let Some(ranges) = self.split_paragraphs(text) {
            (SplitStrategy::Paragraph, ranges)
        } else {
            (SplitStrategy::FixedSize, self.split_fixed(text))
        };

        let chunks: Vec<String> = ranges.into_iter().map(|r| text[r].to_string()).collect();

        info!(
            "Segmented {} chars into {} chunks using {} strategy",
            text.len(),
            chunks.len(),
            strategy
        );

        Segmentation { strategy, chunks }
    }

    /// Structural split on numbered headings; `None` when there are three sections or fewer
    fn split_structural(&self, text: &str) -> Option<Vec<Range<usize>>> {
        let sections = structural_sections(text);
        debug!("Structural split found {} sections", sections.len());
        if sections.len() <= 3 {
            return None;
        }

        let mut chunks = Vec::new();
        let mut pending: Option<Range<usize>> = None;

        for section in sections {
            let current = match pending.take() {
                Some(buffer) => buffer.start..section.end,
                None => section,
            };

            let size = char_len(text, &current);
            if size < self.min_size {
                pending = Some(current);
            } else if size > self.max_size {
                chunks.extend(self.split_sentences(text, current));
            } else {
                chunks.push(current);
            }
        }

        // Undersized tail joins the previous chunk
        if let Some(rest) = pending {
            match chunks.last_mut() {
                Some(last) => last.end = rest.end,
                None => chunks.push(rest),
            }
        }

        Some(chunks)
    }

    /// Split one oversized range on sentence boundaries, packing sentences up to `max_size`
    fn split_sentences(&self, text: &str, range: Range<usize>) -> Vec<Range<usize>> {
        let slice = &text[range.clone()];
        let mut sentences = Vec::new();
        let mut start = 0;
        for m in SENTENCE_END.find_iter(slice) {
            sentences.push(range.start + start..range.start + m.end());
            start = m.end();
        }
        if start < slice.len() {
            sentences.push(range.start + start..range.end);
        }

        let packed = self.pack(text, sentences);
        packed
            .into_iter()
            .filter_map(|r| trim_range(text, r))
            .collect()
    }

    /// Paragraph split; `None` when there are two paragraphs or fewer
    fn split_paragraphs(&self, text: &str) -> Option<Vec<Range<usize>>> {
        let paragraphs = PARAGRAPH_BREAKS
            .iter()
            .map(|separator| split_on(text, separator))
            .fold(Vec::new(), |best, candidate| {
                if candidate.len() > best.len() {
                    candidate
                } else {
                    best
                }
            });

        debug!("Paragraph split found {} paragraphs", paragraphs.len());
        if paragraphs.len() <= 2 {
            return None;
        }

        Some(self.pack(text, paragraphs))
    }

    /// Accumulate consecutive ranges, flushing whenever the next one would exceed `max_size`
    ///
    /// A single range larger than `max_size` is emitted on its own, unsplit.
    fn pack(&self, text: &str, pieces: Vec<Range<usize>>) -> Vec<Range<usize>> {
        let mut chunks = Vec::new();
        let mut current: Option<Range<usize>> = None;

        for piece in pieces {
            current = match current {
                None => Some(piece),
                Some(buffer) => {
                    let merged = buffer.start..piece.end;
                    if char_len(text, &merged) > self.max_size {
                        chunks.push(buffer);
                        Some(piece)
                    } else {
                        Some(merged)
                    }
                }
            };
        }

        if let Some(buffer) = current {
            chunks.push(buffer);
        }

        chunks
    }

    /// Consecutive windows of exactly `max_size` characters
    fn split_fixed(&self, text: &str) -> Vec<Range<usize>> {
        let mut windows = Vec::new();
        let mut start = 0;
        let mut count = 0;

        for (idx, _) in text.char_indices() {
            if count == self.max_size {
                windows.push(start..idx);
                start = idx;
                count = 0;
            }
            count += 1;
        }

        if start < text.len() {
            windows.push(start..text.len());
        }

        windows
    }
}

impl Default for SegmentationEngine {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}

/// Sections starting at each numbered heading, plus any preamble before the first one
fn structural_sections(text: &str) -> Vec<Range<usize>> {
    let mut bounds: Vec<usize> = SECTION_HEADING.find_iter(text).map(|m| m.start()).collect();
    if bounds.first() != Some(&0) {
        bounds.insert(0, 0);
    }
    bounds.push(text.len());

    bounds
        .windows(2)
        .filter_map(|w| trim_range(text, w[0]..w[1]))
        .collect()
}

/// Non-blank pieces between separator matches, trimmed
fn split_on(text: &str, separator: &Regex) -> Vec<Range<usize>> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for m in separator.find_iter(text) {
        pieces.push(start..m.start());
        start = m.end();
    }
    pieces.push(start..text.len());

    pieces
        .into_iter()
        .filter_map(|r| trim_range(text, r))
        .collect()
}

/// Shrink a range to exclude surrounding whitespace; `None` if nothing remains
fn trim_range(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[range.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trimmed_len = slice.trim().len();
    if trimmed_len == 0 {
        return None;
    }
    let start = range.start + leading;
    Some(start..start + trimmed_len)
}

fn char_len(text: &str, range: &Range<usize>) -> usize {
    text[range.clone()].chars().count()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn contract_text() -> impl Strategy<Value = String> {
        let piece = prop_oneof![
            "[A-Z][a-z]{2,8}( [a-z]{1,8}){0,40}[.!?]",
            (1u32..30, "[A-Z]{3,12}( [A-Z]{2,8}){0,2}").prop_map(|(n, t)| format!("{}. {}", n, t)),
            "[a-z ]{0,300}",
        ];
        let separator = prop_oneof![Just("\n"), Just("\n\n"), Just(" "), Just("\r\n\r\n"), Just("\n \n")];

        prop::collection::vec((piece, separator), 0..24).prop_map(|parts| {
            parts
                .into_iter()
                .map(|(piece, separator)| format!("{}{}", piece, separator))
                .collect()
        })
    }

    /// Every chunk appears in order, separated only by whitespace
    fn assert_no_loss(text: &str, chunks: &[String]) -> Result<(), TestCaseError> {
        let mut cursor = 0;
        for chunk in chunks {
            let pos = text[cursor..].find(chunk.as_str());
            prop_assert!(pos.is_some(), "chunk not found in order: {:?}", chunk);
            let pos = pos.unwrap_or_default();
            prop_assert!(text[cursor..cursor + pos].chars().all(char::is_whitespace));
            cursor += pos + chunk.len();
        }
        prop_assert!(text[cursor..].chars().all(char::is_whitespace));
        Ok(())
    }

    proptest! {
        /// Property: segmentation neither drops nor duplicates text
        #[test]
        fn test_segmentation_is_lossless(text in contract_text(), max in 40usize..800, min in 0usize..40) {
            let engine = SegmentationEngine::new(max, min);
            let chunks = engine.segment(&text);
            prop_assert!(!chunks.is_empty());
            assert_no_loss(&text, &chunks)?;
        }

        /// Property: arbitrary unicode input is handled without panics or loss
        #[test]
        fn test_segmentation_handles_any_string(text in any::<String>(), max in 1usize..64) {
            let engine = SegmentationEngine::new(max, 0);
            let chunks = engine.segment(&text);
            assert_no_loss(&text, &chunks)?;
        }

        /// Property: input shorter than the minimum is exactly one chunk
        #[test]
        fn test_short_input_is_single_chunk(text in "[a-zA-Z .\n]{0,99}") {
            let result = SegmentationEngine::default().segment_with_strategy(&text);
            prop_assert_eq!(result.strategy, SplitStrategy::Single);
            prop_assert_eq!(result.chunks.len(), 1);
        }

        /// Property: fixed windows never exceed the maximum size
        #[test]
        fn test_fixed_windows_bounded(words in prop::collection::vec("[a-z]{1,10}", 0..200), max in 10usize..300) {
            let text = words.join(" ");
            let result = SegmentationEngine::new(max, 1).segment_with_strategy(&text);
            if result.strategy == SplitStrategy::FixedSize {
                prop_assert!(result.chunks.iter().all(|c| c.chars().count() <= max));
            }
        }
    }
}
