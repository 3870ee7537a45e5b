//! Ingestion pipeline orchestration.
//!
//! Coordinates the end-to-end ingest workflow:
//! 1. Split body into sentences
//! 2. Normalize to a token matrix
//! 3. Resolve or refresh the document row
//! 4. Replace sentences (delete stale, write new)
//! 5. Build the position list and write postings

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::task::JoinSet;

use crate::core::analysis::{Analyzer, SentenceSplitter};
use crate::core::error::{KensakuError, Result};
use crate::core::store::IndexStore;
use crate::core::types::{IngestStats, Occurrence, Sentence};

/// Orchestrates document ingestion.
pub struct IndexingPipeline {
    analyzer: Arc<Analyzer>,
    splitter: SentenceSplitter,
    store: Arc<dyn IndexStore>,
}

impl IndexingPipeline {
    pub fn new(analyzer: Arc<Analyzer>, store: Arc<dyn IndexStore>) -> Self {
        Self {
            analyzer,
            splitter: SentenceSplitter::new(),
            store,
        }
    }

    /// Ingest (or re-ingest) one document.
    ///
    /// Idempotent per URI: ingesting the same (uri, body) twice leaves
    /// the index in the same observable state as ingesting it once.
    /// Sentence and posting writes fan out concurrently; each phase
    /// waits for all of its writes before the next begins.
    ///
    /// Posting-write failures are collected and reported together as
    /// [`KensakuError::IngestFailed`]; writes that already committed
    /// for other tokens are not rolled back, so a failed ingest can
    /// leave the document partially indexed. Re-ingesting repairs it.
    pub async fn ingest(&self, uri: &str, body: &str) -> Result<IngestStats> {
        let start = Instant::now();

        let sentences = self.splitter.split(body);
        let matrix = self.analyzer.normalize(&sentences);
        let term_count: usize = matrix.iter().map(Vec::len).sum();

        tracing::debug!(
            uri,
            sentences = sentences.len(),
            terms = term_count,
            "normalized document"
        );

        let now = Utc::now();
        let document = match self.store.document_by_uri(uri).await? {
            Some(existing) => {
                tracing::debug!(uri, document_id = existing.id, "re-ingesting document");
                self.store
                    .update_document(existing.id, term_count as u64, now)
                    .await?
            }
            None => {
                self.store
                    .create_document(uri, term_count as u64, now)
                    .await?
            }
        };

        // Stale occurrences must not survive a content edit.
        self.store
            .delete_sentences_for_document(document.id)
            .await?;

        let created = self.write_sentences(document.id, &sentences, &matrix).await?;

        let positions = build_position_list(&matrix, &created);
        self.write_postings(uri, document.id, positions).await?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            uri,
            document_id = document.id,
            sentences = sentences.len(),
            terms = term_count,
            duration_ms,
            "document ingested"
        );

        Ok(IngestStats {
            uri: uri.to_string(),
            sentences: sentences.len(),
            terms: term_count,
            duration_ms,
        })
    }

    /// Write one sentence row per segment concurrently; returns the
    /// created rows in original document order.
    async fn write_sentences(
        &self,
        document_id: u64,
        sentences: &[String],
        matrix: &[Vec<String>],
    ) -> Result<Vec<Sentence>> {
        let mut tasks = JoinSet::new();
        for (index, text) in sentences.iter().enumerate() {
            let store = Arc::clone(&self.store);
            let text = text.clone();
            let term_count = matrix[index].len() as u64;
            tasks.spawn(async move {
                let sentence = store
                    .create_sentence(document_id, index as u64, &text, term_count)
                    .await?;
                Ok::<(usize, Sentence), KensakuError>((index, sentence))
            });
        }

        let mut rows = Vec::with_capacity(sentences.len());
        while let Some(joined) = tasks.join_next().await {
            let (index, sentence) = joined
                .map_err(|e| KensakuError::StorageError(format!("sentence task failed: {e}")))??;
            rows.push((index, sentence));
        }

        // Fan-in order is arbitrary; restore document order.
        rows.sort_by_key(|(index, _)| *index);
        Ok(rows.into_iter().map(|(_, sentence)| sentence).collect())
    }

    /// Resolve tokens and write postings concurrently, collecting
    /// every failure (named by term) instead of aborting sibling
    /// writes.
    async fn write_postings(
        &self,
        uri: &str,
        document_id: u64,
        positions: HashMap<String, Vec<Occurrence>>,
    ) -> Result<()> {
        let mut tasks = JoinSet::new();
        for (term, occurrences) in positions {
            let store = Arc::clone(&self.store);
            tasks.spawn(async move {
                let outcome = async {
                    let token = match store.token_by_string(&term).await? {
                        Some(token) => token,
                        None => store.create_token(&term).await?,
                    };

                    // Distinct sentence set, first-occurrence order.
                    let mut sentence_ids: Vec<u64> = Vec::new();
                    for occurrence in &occurrences {
                        if !sentence_ids.contains(&occurrence.sentence_id) {
                            sentence_ids.push(occurrence.sentence_id);
                        }
                    }

                    store
                        .create_posting(token.id, document_id, sentence_ids, occurrences)
                        .await?;
                    Ok::<(), KensakuError>(())
                }
                .await;
                (term, outcome)
            });
        }

        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(()))) => {}
                Ok((term, Err(e))) => failures.push(format!("'{term}': {e}")),
                Err(e) => failures.push(format!("task failed: {e}")),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            // Fan-in completion order is arbitrary; report by term.
            failures.sort();
            tracing::warn!(
                uri,
                document_id,
                failed = failures.len(),
                "posting writes failed; document may be partially indexed"
            );
            Err(KensakuError::IngestFailed {
                uri: uri.to_string(),
                failures,
            })
        }
    }
}

/// Build the position list keyed by normalized token.
///
/// The document-global counter increases monotonically across all
/// sentences and never resets per sentence.
fn build_position_list(
    matrix: &[Vec<String>],
    sentences: &[Sentence],
) -> HashMap<String, Vec<Occurrence>> {
    let mut positions: HashMap<String, Vec<Occurrence>> = HashMap::new();
    let mut document_offset = 0u64;

    for (i, row) in matrix.iter().enumerate() {
        for (j, term) in row.iter().enumerate() {
            positions.entry(term.clone()).or_default().push(Occurrence {
                sentence_id: sentences[i].id,
                sentence_offset: j as u64,
                document_offset,
            });
            document_offset += 1;
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AnalysisConfig;
    use crate::core::store::MemoryStore;

    fn pipeline(store: Arc<MemoryStore>) -> IndexingPipeline {
        let analyzer = Arc::new(Analyzer::from_config(&AnalysisConfig::default()));
        IndexingPipeline::new(analyzer, store)
    }

    fn sentence_fixture(ids: &[u64]) -> Vec<Sentence> {
        ids.iter()
            .enumerate()
            .map(|(index, &id)| Sentence {
                id,
                document_id: 1,
                index: index as u64,
                text: String::new(),
                term_count: 0,
            })
            .collect()
    }

    #[test]
    fn test_position_list_counter_never_resets() {
        let matrix = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["a".to_string()],
        ];
        let sentences = sentence_fixture(&[10, 11]);

        let positions = build_position_list(&matrix, &sentences);

        let a = &positions["a"];
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].document_offset, 0);
        assert_eq!(a[1].document_offset, 2, "counter continues across sentences");
        assert_eq!(a[1].sentence_offset, 0, "sentence-local offset resets");
        assert_eq!(a[1].sentence_id, 11);
    }

    #[test]
    fn test_position_list_skips_empty_rows() {
        let matrix = vec![vec![], vec!["x".to_string()]];
        let sentences = sentence_fixture(&[1, 2]);

        let positions = build_position_list(&matrix, &sentences);

        assert_eq!(positions.len(), 1);
        assert_eq!(positions["x"][0].document_offset, 0);
        assert_eq!(positions["x"][0].sentence_id, 2);
    }

    #[tokio::test]
    async fn test_ingest_creates_document_and_postings() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(Arc::clone(&store));

        let stats = pipeline
            .ingest("doc://a", "Rust is fast. Rust is safe.")
            .await
            .unwrap();

        assert_eq!(stats.sentences, 2);
        assert_eq!(store.count_documents().await.unwrap(), 1);

        let token = store.token_by_string("rust").await.unwrap().unwrap();
        let views = store.postings_for_token(token.id).await.unwrap();
        assert_eq!(views.len(), 1, "one posting per (token, document)");
        assert_eq!(views[0].posting.sentence_ids.len(), 2);
        assert_eq!(views[0].positions.len(), 2);
    }

    #[tokio::test]
    async fn test_reingest_replaces_sentences() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(Arc::clone(&store));

        pipeline.ingest("doc://a", "old content here").await.unwrap();
        let old_token = store.token_by_string("old").await.unwrap().unwrap();

        pipeline.ingest("doc://a", "new content here").await.unwrap();

        // Stale occurrences are gone; the token row itself survives.
        assert!(store
            .postings_for_token(old_token.id)
            .await
            .unwrap()
            .is_empty());
        assert!(store.token_by_string("old").await.unwrap().is_some());
        assert_eq!(store.count_documents().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reingest_refreshes_term_count() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(Arc::clone(&store));

        pipeline.ingest("doc://a", "one two three four").await.unwrap();
        let before = store.document_by_uri("doc://a").await.unwrap().unwrap();

        pipeline.ingest("doc://a", "one two").await.unwrap();
        let after = store.document_by_uri("doc://a").await.unwrap().unwrap();

        assert_eq!(before.id, after.id, "document id stable across re-ingest");
        assert!(after.term_count < before.term_count);
    }

    #[tokio::test]
    async fn test_ingest_empty_body() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(Arc::clone(&store));

        let stats = pipeline.ingest("doc://empty", "").await.unwrap();

        assert_eq!(stats.sentences, 0);
        assert_eq!(stats.terms, 0);
        assert_eq!(store.count_documents().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sentence_order_preserved() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(Arc::clone(&store));

        pipeline
            .ingest("doc://a", "Alpha first. Beta second. Gamma third.")
            .await
            .unwrap();

        let token = store.token_by_string("beta").await.unwrap().unwrap();
        let views = store.postings_for_token(token.id).await.unwrap();
        let sentence_id = views[0].posting.sentence_ids[0];
        let sentences = store.sentences_by_ids(&[sentence_id]).await.unwrap();

        assert_eq!(sentences[0].index, 1);
        assert_eq!(sentences[0].text, "Beta second.");
    }
}
