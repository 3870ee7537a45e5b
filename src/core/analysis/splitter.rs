//! Sentence splitting using Unicode sentence boundaries.

use unicode_segmentation::UnicodeSegmentation;

/// Segments a document body into an ordered sequence of sentences
/// using UAX #29 sentence-boundary rules.
#[derive(Debug, Default)]
pub struct SentenceSplitter;

impl SentenceSplitter {
    pub fn new() -> Self {
        Self
    }

    /// Split `body` into sentences, preserving original order.
    ///
    /// Segments are trimmed of surrounding whitespace; segments that
    /// contain only whitespace are dropped. An empty body yields an
    /// empty sequence, never an error.
    pub fn split(&self, body: &str) -> Vec<String> {
        body.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
