//! Character filters: raw-text rewrites applied before tokenization.

use std::collections::BTreeMap;

/// A rewrite over raw text, applied before sentence text reaches the
/// tokenizer. Character filters never see tokens.
pub trait CharFilter: Send + Sync {
    /// Apply the filter to each input string, preserving positions.
    fn apply(&self, texts: &[String]) -> Vec<String>;
}

/// Substitutes fixed string mappings in raw text, e.g. `":)" -> "happy"`.
///
/// Mappings are applied in key order so repeated runs over the same
/// input produce identical output.
pub struct MappingCharFilter {
    mappings: BTreeMap<String, String>,
}

impl MappingCharFilter {
    /// Create a filter from a fixed substitution table.
    pub fn new(mappings: BTreeMap<String, String>) -> Self {
        Self { mappings }
    }
}

impl CharFilter for MappingCharFilter {
    fn apply(&self, texts: &[String]) -> Vec<String> {
        texts
            .iter()
            .map(|text| {
                let mut rewritten = text.clone();
                for (from, to) in &self.mappings {
                    rewritten = rewritten.replace(from.as_str(), to);
                }
                rewritten
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(pairs: &[(&str, &str)]) -> MappingCharFilter {
        let mappings = pairs
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        MappingCharFilter::new(mappings)
    }

    #[test]
    fn test_single_mapping() {
        let f = filter(&[(":)", "happy")]);
        let out = f.apply(&["I am :) today".to_string()]);
        assert_eq!(out, vec!["I am happy today".to_string()]);
    }

    #[test]
    fn test_replaces_all_occurrences() {
        let f = filter(&[(":)", "happy")]);
        let out = f.apply(&[":) and :)".to_string()]);
        assert_eq!(out, vec!["happy and happy".to_string()]);
    }

    #[test]
    fn test_positions_preserved() {
        let f = filter(&[("&", "and")]);
        let out = f.apply(&["a & b".to_string(), "untouched".to_string()]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], "a and b");
        assert_eq!(out[1], "untouched");
    }

    #[test]
    fn test_empty_mapping_is_identity() {
        let f = filter(&[]);
        let input = vec!["unchanged text".to_string()];
        assert_eq!(f.apply(&input), input);
    }

    #[test]
    fn test_no_match_leaves_text_alone() {
        let f = filter(&[(":(", "sad")]);
        let out = f.apply(&["all fine here".to_string()]);
        assert_eq!(out[0], "all fine here");
    }
}
