//! Core data types for the kensaku engine.
//!
//! Index entities (tokens, documents, sentences, postings, positions)
//! are owned by the store; the engine only holds request-scoped views
//! of them. Result types are serde-serializable so the caller's
//! request layer can encode them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique normalized term in the index dictionary.
///
/// Created lazily on first occurrence and never deleted, even when no
/// posting references it anymore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: u64,

    /// The normalized term string (unique).
    pub token: String,
}

/// An ingested document, identified by a caller-supplied URI.
///
/// Re-ingesting the same URI refreshes `term_count` and `ingested_at`
/// in place; `id` is stable across re-ingests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,

    /// Caller-supplied identifier (unique).
    pub uri: String,

    /// Time of the most recent ingest.
    pub ingested_at: DateTime<Utc>,

    /// Total number of terms across all sentences.
    pub term_count: u64,
}

/// One sentence of a document.
///
/// All sentences for a document are deleted and recreated on
/// re-ingestion; there are no partial sentence updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: u64,

    /// Owning document.
    pub document_id: u64,

    /// Ordinal position within the document (0-based).
    pub index: u64,

    /// Raw sentence text, as split from the original body.
    pub text: String,

    /// Number of normalized terms in this sentence.
    pub term_count: u64,
}

/// The occurrence record of one token within one document.
///
/// One posting exists per (token, document) pair per ingestion cycle;
/// occurrence multiplicity lives in [`TokenPosition`] records, not in
/// duplicate postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub id: u64,
    pub token_id: u64,
    pub document_id: u64,

    /// Distinct sentences the token occurs in.
    ///
    /// Part of the stored schema; retrieval does not read it, since
    /// the snippet sentence set is derived from [`TokenPosition`]
    /// records, which also carry the ordering key.
    pub sentence_ids: Vec<u64>,
}

/// One concrete occurrence of a token.
///
/// `document_offset - sentence_offset` is constant for all occurrences
/// within one sentence (the token offset of the sentence start), which
/// makes it a stable grouping key for snippet reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPosition {
    pub id: u64,
    pub posting_id: u64,
    pub sentence_id: u64,

    /// Offset of the occurrence within its sentence.
    pub sentence_offset: u64,

    /// Offset within the whole document; never resets per sentence.
    pub document_offset: u64,
}

/// An occurrence to record when creating a posting, before the store
/// has assigned the posting id.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub sentence_id: u64,
    pub sentence_offset: u64,
    pub document_offset: u64,
}

/// A posting with its occurrence positions attached, as returned by
/// the store for retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingView {
    pub posting: Posting,
    pub positions: Vec<TokenPosition>,
}

/// A single ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// URI of the matched document.
    pub uri: String,

    /// Aggregate TF-IDF score (higher = more relevant).
    pub score: f64,

    /// Snippet sentences in original document order, deduplicated.
    pub sentences: Vec<String>,
}

/// Statistics from one ingest call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    /// Document URI that was ingested.
    pub uri: String,

    /// Number of sentences written.
    pub sentences: usize,

    /// Total normalized terms across all sentences.
    pub terms: usize,

    /// Ingest duration in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_hit_serialization() {
        let hit = SearchHit {
            uri: "doc://a".to_string(),
            score: 0.25,
            sentences: vec!["First sentence.".to_string()],
        };

        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains("doc://a"));
        assert!(json.contains("First sentence."));

        let back: SearchHit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.uri, hit.uri);
        assert_eq!(back.sentences, hit.sentences);
    }

    #[test]
    fn test_position_grouping_key_is_sentence_start() {
        // Two occurrences in the same sentence share the grouping key.
        let first = TokenPosition {
            id: 1,
            posting_id: 1,
            sentence_id: 7,
            sentence_offset: 0,
            document_offset: 12,
        };
        let second = TokenPosition {
            id: 2,
            posting_id: 1,
            sentence_id: 7,
            sentence_offset: 3,
            document_offset: 15,
        };

        assert_eq!(
            first.document_offset - first.sentence_offset,
            second.document_offset - second.sentence_offset
        );
    }

    #[test]
    fn test_ingest_stats_fields() {
        let stats = IngestStats {
            uri: "doc://a".to_string(),
            sentences: 3,
            terms: 17,
            duration_ms: 5,
        };

        assert_eq!(stats.sentences, 3);
        assert_eq!(stats.terms, 17);
    }
}
