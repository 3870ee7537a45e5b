//! Ranked retrieval over the inverted index.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;

use crate::core::analysis::Analyzer;
use crate::core::config::SearchConfig;
use crate::core::error::{KensakuError, Result};
use crate::core::search::tfidf;
use crate::core::store::IndexStore;
use crate::core::types::{PostingView, SearchHit, Token};

/// TF-IDF search service.
pub struct SearchService {
    analyzer: Arc<Analyzer>,
    store: Arc<dyn IndexStore>,
    max_count: usize,
    max_query_length: usize,
}

impl SearchService {
    pub fn new(analyzer: Arc<Analyzer>, store: Arc<dyn IndexStore>, config: &SearchConfig) -> Self {
        Self {
            analyzer,
            store,
            max_count: config.max_count,
            max_query_length: config.max_query_length,
        }
    }

    /// Execute a ranked query.
    ///
    /// Query tokens with no dictionary entry are silently dropped;
    /// matching is a strict AND across the tokens that resolve. The
    /// `offset`/`count` window is a cursor over the ranked list: a
    /// window past the end returns an empty (or short) result without
    /// error. `count` is clamped to the configured maximum.
    pub async fn search(
        &self,
        query: &str,
        offset: usize,
        count: usize,
    ) -> Result<Vec<SearchHit>> {
        let start = Instant::now();

        if query.len() > self.max_query_length {
            return Err(KensakuError::InvalidQuery(format!(
                "query exceeds {} bytes",
                self.max_query_length
            )));
        }

        let matrix = self.analyzer.normalize(&[query.to_string()]);
        let terms = matrix.into_iter().next().unwrap_or_default();
        if terms.is_empty() {
            return Err(KensakuError::InvalidQuery(
                "no searchable terms in query".to_string(),
            ));
        }

        let corpus_size = self.store.count_documents().await?;

        let tokens = self.resolve_tokens(terms).await?;
        if tokens.is_empty() {
            tracing::debug!(query, "no query token found in dictionary");
            return Ok(Vec::new());
        }

        let postings = self.fetch_postings(&tokens).await?;

        let candidates = intersect_candidates(&tokens, &postings);

        let mut scores: HashMap<u64, f64> = HashMap::new();
        for &document_id in &candidates {
            let term_count = self.store.count_terms_in_document(document_id).await?;
            let mut score = 1.0;
            for token in &tokens {
                let posting_count = postings.get(&token.id).map_or(0, Vec::len);
                score *= tfidf::tf(posting_count, term_count)
                    * tfidf::idf(corpus_size, posting_count);
            }
            scores.insert(document_id, score);
        }

        // Stable sort over id-ascending candidates: equal scores keep
        // document id order, making ranking deterministic.
        let mut ranked = candidates;
        ranked.sort_by(|a, b| {
            let score_a = scores.get(a).copied().unwrap_or(0.0);
            let score_b = scores.get(b).copied().unwrap_or(0.0);
            score_b.partial_cmp(&score_a).unwrap_or(Ordering::Equal)
        });

        let count = count.min(self.max_count);
        let mut results = Vec::new();
        let mut cursor = offset;
        while results.len() < count && cursor < ranked.len() {
            let document_id = ranked[cursor];
            let sentences = self.reconstruct_snippets(document_id, &tokens, &postings).await?;
            let document = self.store.document_by_id(document_id).await?.ok_or_else(|| {
                KensakuError::StorageError(format!(
                    "document {document_id} disappeared during search"
                ))
            })?;

            results.push(SearchHit {
                uri: document.uri,
                score: scores.get(&document_id).copied().unwrap_or(0.0),
                sentences,
            });
            cursor += 1;
        }

        tracing::debug!(
            query,
            matches = ranked.len(),
            returned = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "search complete"
        );

        Ok(results)
    }

    /// Resolve query terms to dictionary tokens concurrently.
    ///
    /// Unknown terms are dropped, not errors: if at least one term
    /// resolves, the search proceeds on the hits that exist. Duplicate
    /// query terms collapse to one token so the AND intersection
    /// counts each token once.
    async fn resolve_tokens(&self, terms: Vec<String>) -> Result<Vec<Token>> {
        let mut tasks = JoinSet::new();
        for term in terms {
            let store = Arc::clone(&self.store);
            tasks.spawn(async move { store.token_by_string(&term).await });
        }

        let mut tokens: Vec<Token> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let resolved = joined
                .map_err(|e| KensakuError::StorageError(format!("token task failed: {e}")))??;
            if let Some(token) = resolved {
                tokens.push(token);
            }
        }

        tokens.sort_by_key(|t| t.id);
        tokens.dedup_by_key(|t| t.id);
        Ok(tokens)
    }

    /// Fetch the full posting list of every resolved token
    /// concurrently, failing fast on the first storage error.
    async fn fetch_postings(
        &self,
        tokens: &[Token],
    ) -> Result<HashMap<u64, Vec<PostingView>>> {
        let mut tasks = JoinSet::new();
        for token in tokens {
            let store = Arc::clone(&self.store);
            let token_id = token.id;
            tasks.spawn(async move {
                let views = store.postings_for_token(token_id).await?;
                Ok::<(u64, Vec<PostingView>), KensakuError>((token_id, views))
            });
        }

        let mut postings = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (token_id, views) = joined
                .map_err(|e| KensakuError::StorageError(format!("posting task failed: {e}")))??;
            postings.insert(token_id, views);
        }
        Ok(postings)
    }

    /// Reconstruct snippet sentences for one returned document.
    ///
    /// Unions the sentences referenced by every resolved token's
    /// postings for this document, deduplicates by sentence identity,
    /// and orders them by `document_offset - sentence_offset` — the
    /// token offset of each sentence's start, which recovers original
    /// document order from the stored positions alone.
    async fn reconstruct_snippets(
        &self,
        document_id: u64,
        tokens: &[Token],
        postings: &HashMap<u64, Vec<PostingView>>,
    ) -> Result<Vec<String>> {
        let mut sentence_keys: BTreeMap<u64, u64> = BTreeMap::new();
        for token in tokens {
            let Some(views) = postings.get(&token.id) else {
                continue;
            };
            for view in views {
                if view.posting.document_id != document_id {
                    continue;
                }
                for position in &view.positions {
                    let key = position.document_offset - position.sentence_offset;
                    sentence_keys
                        .entry(position.sentence_id)
                        .and_modify(|k| *k = (*k).min(key))
                        .or_insert(key);
                }
            }
        }

        let ids: Vec<u64> = sentence_keys.keys().copied().collect();
        let sentences = self.store.sentences_by_ids(&ids).await?;

        let mut ordered: Vec<_> = sentences.into_iter().collect();
        ordered.sort_by_key(|s| sentence_keys.get(&s.id).copied().unwrap_or(u64::MAX));
        Ok(ordered.into_iter().map(|s| s.text).collect())
    }
}

/// Documents appearing in every resolved token's posting list,
/// returned in document id ascending order.
fn intersect_candidates(
    tokens: &[Token],
    postings: &HashMap<u64, Vec<PostingView>>,
) -> Vec<u64> {
    let mut hits_per_document: HashMap<u64, usize> = HashMap::new();
    for token in tokens {
        let Some(views) = postings.get(&token.id) else {
            continue;
        };
        for view in views {
            *hits_per_document.entry(view.posting.document_id).or_insert(0) += 1;
        }
    }

    let mut candidates: Vec<u64> = hits_per_document
        .into_iter()
        .filter(|&(_, hits)| hits == tokens.len())
        .map(|(document_id, _)| document_id)
        .collect();
    candidates.sort_unstable();
    candidates
}
