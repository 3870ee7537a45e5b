//! Index storage layer.
//!
//! The engine owns no persistence of its own: every index entity
//! lives behind the [`IndexStore`] trait, which mirrors the narrow
//! contract a transactional relational backend would implement
//! (tables for tokens, documents, sentences, postings and token
//! positions, with soft-delete semantics for replaced rows).
//!
//! [`MemoryStore`] is the in-process implementation used in tests and
//! embedded deployments. Each trait call is one atomic unit: either
//! all of its writes become visible or none do.

mod memory;

pub use memory::MemoryStore;

use crate::core::error::Result;
use crate::core::types::{Document, Occurrence, Posting, PostingView, Sentence, Token};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage contract for the inverted index.
///
/// Lookups return `Ok(None)` for missing rows; that is a valid
/// "no data" signal, not an error. All mutating operations execute
/// atomically; a failure leaves no partial writes visible.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Total number of documents in the corpus.
    async fn count_documents(&self) -> Result<u64>;

    /// Total term count of one document (denominator for TF).
    async fn count_terms_in_document(&self, document_id: u64) -> Result<u64>;

    async fn document_by_uri(&self, uri: &str) -> Result<Option<Document>>;

    async fn document_by_id(&self, id: u64) -> Result<Option<Document>>;

    /// Create a document. Creation is idempotent per URI: if the URI
    /// already exists the stored row is returned unchanged.
    async fn create_document(
        &self,
        uri: &str,
        term_count: u64,
        ingested_at: DateTime<Utc>,
    ) -> Result<Document>;

    /// Refresh a document's term count and timestamp in place. The
    /// document id and URI are stable across updates.
    async fn update_document(
        &self,
        id: u64,
        term_count: u64,
        ingested_at: DateTime<Utc>,
    ) -> Result<Document>;

    async fn token_by_string(&self, token: &str) -> Result<Option<Token>>;

    async fn token_by_id(&self, id: u64) -> Result<Option<Token>>;

    /// Create a token. Idempotent per string: concurrent creation of
    /// the same term yields one row.
    async fn create_token(&self, token: &str) -> Result<Token>;

    /// All live postings for a token, with their occurrence positions
    /// attached.
    async fn postings_for_token(&self, token_id: u64) -> Result<Vec<PostingView>>;

    /// Create one posting for a (token, document) pair together with
    /// its occurrence positions, atomically.
    async fn create_posting(
        &self,
        token_id: u64,
        document_id: u64,
        sentence_ids: Vec<u64>,
        occurrences: Vec<Occurrence>,
    ) -> Result<Posting>;

    /// Fetch sentences by id set, ordered by id ascending.
    async fn sentences_by_ids(&self, ids: &[u64]) -> Result<Vec<Sentence>>;

    async fn create_sentence(
        &self,
        document_id: u64,
        index: u64,
        text: &str,
        term_count: u64,
    ) -> Result<Sentence>;

    /// Delete every sentence owned by a document, and transitively
    /// the postings and positions that reference them, in one atomic
    /// unit. Used to replace a document's index state on re-ingest.
    async fn delete_sentences_for_document(&self, document_id: u64) -> Result<()>;
}
