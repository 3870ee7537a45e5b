//! Text normalization pipeline.
//!
//! Raw text is threaded through, in fixed order: character filters
//! (whole-string rewrites), the tokenizer (one token sequence per
//! input string), then word filters (token-matrix transforms). Every
//! stage is pure and stateless across calls; character filters never
//! see tokens and word filters never see raw text.
//!
//! Sentence splitting happens before the pipeline: the indexer splits
//! a body into sentences and feeds them in as the input sequence.

pub mod char_filter;
pub mod splitter;
pub mod tokenizer;
pub mod word_filter;

pub use char_filter::{CharFilter, MappingCharFilter};
pub use splitter::SentenceSplitter;
pub use tokenizer::{Tokenizer, UnicodeTokenizer};
pub use word_filter::{LowercaseFilter, StemmerFilter, StopWordFilter, WordFilter};

use crate::core::config::AnalysisConfig;

/// The configured normalization pipeline.
///
/// Constructed once from [`AnalysisConfig`] and shared by the indexer
/// and the search engine so both sides normalize text identically.
pub struct Analyzer {
    char_filters: Vec<Box<dyn CharFilter>>,
    tokenizer: Box<dyn Tokenizer>,
    word_filters: Vec<Box<dyn WordFilter>>,
}

impl Analyzer {
    /// Build the filter chains from configuration.
    ///
    /// Chain order is fixed: mapping substitutions, tokenization,
    /// lowercasing, stop-word removal, stemming. Stemming runs last so
    /// it sees folded tokens.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let mut char_filters: Vec<Box<dyn CharFilter>> = Vec::new();
        if !config.char_mappings.is_empty() {
            char_filters.push(Box::new(MappingCharFilter::new(
                config.char_mappings.clone(),
            )));
        }

        let mut word_filters: Vec<Box<dyn WordFilter>> = Vec::new();
        if config.lowercase {
            word_filters.push(Box::new(LowercaseFilter::new()));
        }
        if !config.stop_words.is_empty() {
            word_filters.push(Box::new(StopWordFilter::new(&config.stop_words)));
        }
        if config.stemming {
            word_filters.push(Box::new(StemmerFilter::new()));
        }

        Self {
            char_filters,
            tokenizer: Box::new(UnicodeTokenizer::new()),
            word_filters,
        }
    }

    /// Normalize a sequence of raw texts into a token matrix aligned
    /// 1:1 with the input.
    ///
    /// An input string that filters down to nothing yields an empty
    /// token sequence at its position, never an error.
    pub fn normalize(&self, texts: &[String]) -> Vec<Vec<String>> {
        let mut texts = texts.to_vec();
        for filter in &self.char_filters {
            texts = filter.apply(&texts);
        }

        let mut matrix = self.tokenizer.analyze(&texts);
        for filter in &self.word_filters {
            matrix = filter.apply(matrix);
        }
        matrix
    }
}
