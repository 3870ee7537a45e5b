//! Word filters: transforms applied to the token matrix after
//! tokenization. Composable and applied in configuration order.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

/// A transform over the whole token matrix. Word filters never see
/// raw text; positions in the outer sequence are preserved.
pub trait WordFilter: Send + Sync {
    fn apply(&self, tokens: Vec<Vec<String>>) -> Vec<Vec<String>>;
}

/// Folds every token to Unicode lowercase.
#[derive(Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        Self
    }
}

impl WordFilter for LowercaseFilter {
    fn apply(&self, tokens: Vec<Vec<String>>) -> Vec<Vec<String>> {
        tokens
            .into_iter()
            .map(|row| row.into_iter().map(|t| t.to_lowercase()).collect())
            .collect()
    }
}

/// Removes tokens found in a fixed stop-word set.
pub struct StopWordFilter {
    stop_words: HashSet<String>,
}

impl StopWordFilter {
    pub fn new(stop_words: &[String]) -> Self {
        Self {
            stop_words: stop_words.iter().cloned().collect(),
        }
    }
}

impl WordFilter for StopWordFilter {
    fn apply(&self, tokens: Vec<Vec<String>>) -> Vec<Vec<String>> {
        tokens
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .filter(|t| !self.stop_words.contains(t))
                    .collect()
            })
            .collect()
    }
}

/// Reduces tokens to their Snowball stem.
pub struct StemmerFilter {
    stemmer: Stemmer,
}

impl StemmerFilter {
    /// English stemming. Run after lowercasing; the Snowball
    /// algorithms expect lowercase input.
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for StemmerFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl WordFilter for StemmerFilter {
    fn apply(&self, tokens: Vec<Vec<String>>) -> Vec<Vec<String>> {
        tokens
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|t| self.stemmer.stem(&t).into_owned())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_lowercase() {
        let out = LowercaseFilter::new().apply(matrix(&[&["Hello", "WORLD"]]));
        assert_eq!(out, matrix(&[&["hello", "world"]]));
    }

    #[test]
    fn test_stop_words_removed() {
        let filter = StopWordFilter::new(&["the".to_string(), "a".to_string()]);
        let out = filter.apply(matrix(&[&["the", "quick", "a", "fox"]]));
        assert_eq!(out, matrix(&[&["quick", "fox"]]));
    }

    #[test]
    fn test_stop_words_can_empty_a_row() {
        let filter = StopWordFilter::new(&["the".to_string()]);
        let out = filter.apply(matrix(&[&["the", "the"], &["keep"]]));
        assert_eq!(out.len(), 2);
        assert!(out[0].is_empty());
        assert_eq!(out[1], vec!["keep"]);
    }

    #[test]
    fn test_stemming() {
        let out = StemmerFilter::new().apply(matrix(&[&["running", "quickly"]]));
        assert_eq!(out, matrix(&[&["run", "quick"]]));
    }

    #[test]
    fn test_row_positions_preserved() {
        let filter = StopWordFilter::new(&[]);
        let input = matrix(&[&["one"], &[], &["two", "three"]]);
        let out = filter.apply(input.clone());
        assert_eq!(out, input);
    }
}
