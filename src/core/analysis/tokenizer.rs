//! Tokenization of sentence text into surface tokens.

use unicode_segmentation::UnicodeSegmentation;

/// Morphological analysis of sentences into ordered token sequences.
///
/// This trait is the seam where a dictionary-backed morphological
/// analyzer (with reading-form normalization for scripts like
/// Japanese) plugs in. Implementations must never emit whitespace or
/// punctuation units.
pub trait Tokenizer: Send + Sync {
    /// Produce one token sequence per input string, aligned by index.
    fn analyze(&self, texts: &[String]) -> Vec<Vec<String>>;
}

/// Default tokenizer based on UAX #29 word boundaries.
///
/// Unicode word segmentation handles scripts without whitespace-
/// delimited words and drops whitespace and punctuation runs, so a
/// sentence of only punctuation yields an empty token sequence.
/// Surface forms are emitted unchanged; normalization such as case
/// folding and stemming belongs to the word filters downstream.
#[derive(Debug, Default)]
pub struct UnicodeTokenizer;

impl UnicodeTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for UnicodeTokenizer {
    fn analyze(&self, texts: &[String]) -> Vec<Vec<String>> {
        texts
            .iter()
            .map(|text| text.unicode_words().map(str::to_string).collect())
            .collect()
    }
}
