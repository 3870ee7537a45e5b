//! In-memory index store with soft deletes.

use crate::core::error::{KensakuError, Result};
use crate::core::store::IndexStore;
use crate::core::types::{Document, Occurrence, Posting, PostingView, Sentence, Token, TokenPosition};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-local [`IndexStore`] implementation.
///
/// Row tables live behind a single `RwLock`; each trait call takes
/// the lock exactly once, which makes every call one atomic unit and
/// serializes conflicting writes. Replaced rows are soft-deleted:
/// they keep their ids but become invisible to lookups.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    next_document_id: u64,
    next_token_id: u64,
    next_sentence_id: u64,
    next_posting_id: u64,
    next_position_id: u64,

    documents: BTreeMap<u64, Document>,
    documents_by_uri: HashMap<String, u64>,
    tokens: BTreeMap<u64, Token>,
    tokens_by_string: HashMap<String, u64>,
    sentences: BTreeMap<u64, SentenceRow>,
    postings: BTreeMap<u64, PostingRow>,
    positions: BTreeMap<u64, PositionRow>,
}

struct SentenceRow {
    sentence: Sentence,
    deleted: bool,
}

struct PostingRow {
    posting: Posting,
    deleted: bool,
}

struct PositionRow {
    position: TokenPosition,
    deleted: bool,
}

impl Tables {
    fn allocate(counter: &mut u64) -> u64 {
        *counter += 1;
        *counter
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| KensakuError::StorageError("index store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| KensakuError::StorageError("index store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexStore for MemoryStore {
    async fn count_documents(&self) -> Result<u64> {
        let tables = self.read()?;
        Ok(tables.documents.len() as u64)
    }

    async fn count_terms_in_document(&self, document_id: u64) -> Result<u64> {
        let tables = self.read()?;
        tables
            .documents
            .get(&document_id)
            .map(|d| d.term_count)
            .ok_or_else(|| {
                KensakuError::StorageError(format!("document {document_id} not found"))
            })
    }

    async fn document_by_uri(&self, uri: &str) -> Result<Option<Document>> {
        let tables = self.read()?;
        Ok(tables
            .documents_by_uri
            .get(uri)
            .and_then(|id| tables.documents.get(id))
            .cloned())
    }

    async fn document_by_id(&self, id: u64) -> Result<Option<Document>> {
        let tables = self.read()?;
        Ok(tables.documents.get(&id).cloned())
    }

    async fn create_document(
        &self,
        uri: &str,
        term_count: u64,
        ingested_at: DateTime<Utc>,
    ) -> Result<Document> {
        let mut tables = self.write()?;

        // Idempotent per URI: a concurrent creator wins, later callers
        // see the stored row.
        if let Some(existing) = tables
            .documents_by_uri
            .get(uri)
            .and_then(|id| tables.documents.get(id))
        {
            return Ok(existing.clone());
        }

        let id = Tables::allocate(&mut tables.next_document_id);
        let document = Document {
            id,
            uri: uri.to_string(),
            ingested_at,
            term_count,
        };
        tables.documents.insert(id, document.clone());
        tables.documents_by_uri.insert(uri.to_string(), id);
        Ok(document)
    }

    async fn update_document(
        &self,
        id: u64,
        term_count: u64,
        ingested_at: DateTime<Utc>,
    ) -> Result<Document> {
        let mut tables = self.write()?;
        let document = tables
            .documents
            .get_mut(&id)
            .ok_or_else(|| KensakuError::StorageError(format!("document {id} not found")))?;
        document.term_count = term_count;
        document.ingested_at = ingested_at;
        Ok(document.clone())
    }

    async fn token_by_string(&self, token: &str) -> Result<Option<Token>> {
        let tables = self.read()?;
        Ok(tables
            .tokens_by_string
            .get(token)
            .and_then(|id| tables.tokens.get(id))
            .cloned())
    }

    async fn token_by_id(&self, id: u64) -> Result<Option<Token>> {
        let tables = self.read()?;
        Ok(tables.tokens.get(&id).cloned())
    }

    async fn create_token(&self, token: &str) -> Result<Token> {
        let mut tables = self.write()?;

        if let Some(existing) = tables
            .tokens_by_string
            .get(token)
            .and_then(|id| tables.tokens.get(id))
        {
            return Ok(existing.clone());
        }

        let id = Tables::allocate(&mut tables.next_token_id);
        let row = Token {
            id,
            token: token.to_string(),
        };
        tables.tokens.insert(id, row.clone());
        tables.tokens_by_string.insert(token.to_string(), id);
        Ok(row)
    }

    async fn postings_for_token(&self, token_id: u64) -> Result<Vec<PostingView>> {
        let tables = self.read()?;
        let mut views = Vec::new();

        for row in tables.postings.values() {
            if row.deleted || row.posting.token_id != token_id {
                continue;
            }
            let mut positions: Vec<TokenPosition> = tables
                .positions
                .values()
                .filter(|p| !p.deleted && p.position.posting_id == row.posting.id)
                .map(|p| p.position.clone())
                .collect();
            positions.sort_by_key(|p| p.document_offset);

            views.push(PostingView {
                posting: row.posting.clone(),
                positions,
            });
        }

        Ok(views)
    }

    async fn create_posting(
        &self,
        token_id: u64,
        document_id: u64,
        sentence_ids: Vec<u64>,
        occurrences: Vec<Occurrence>,
    ) -> Result<Posting> {
        let mut tables = self.write()?;

        let posting_id = Tables::allocate(&mut tables.next_posting_id);
        let posting = Posting {
            id: posting_id,
            token_id,
            document_id,
            sentence_ids,
        };
        tables.postings.insert(
            posting_id,
            PostingRow {
                posting: posting.clone(),
                deleted: false,
            },
        );

        for occurrence in occurrences {
            let id = Tables::allocate(&mut tables.next_position_id);
            tables.positions.insert(
                id,
                PositionRow {
                    position: TokenPosition {
                        id,
                        posting_id,
                        sentence_id: occurrence.sentence_id,
                        sentence_offset: occurrence.sentence_offset,
                        document_offset: occurrence.document_offset,
                    },
                    deleted: false,
                },
            );
        }

        Ok(posting)
    }

    async fn sentences_by_ids(&self, ids: &[u64]) -> Result<Vec<Sentence>> {
        let tables = self.read()?;
        let wanted: HashSet<u64> = ids.iter().copied().collect();

        // BTreeMap iteration yields ascending ids.
        Ok(tables
            .sentences
            .values()
            .filter(|row| !row.deleted && wanted.contains(&row.sentence.id))
            .map(|row| row.sentence.clone())
            .collect())
    }

    async fn create_sentence(
        &self,
        document_id: u64,
        index: u64,
        text: &str,
        term_count: u64,
    ) -> Result<Sentence> {
        let mut tables = self.write()?;

        let id = Tables::allocate(&mut tables.next_sentence_id);
        let sentence = Sentence {
            id,
            document_id,
            index,
            text: text.to_string(),
            term_count,
        };
        tables.sentences.insert(
            id,
            SentenceRow {
                sentence: sentence.clone(),
                deleted: false,
            },
        );
        Ok(sentence)
    }

    async fn delete_sentences_for_document(&self, document_id: u64) -> Result<()> {
        let mut tables = self.write()?;

        for row in tables.sentences.values_mut() {
            if row.sentence.document_id == document_id {
                row.deleted = true;
            }
        }

        let mut dead_postings = HashSet::new();
        for row in tables.postings.values_mut() {
            if !row.deleted && row.posting.document_id == document_id {
                row.deleted = true;
                dead_postings.insert(row.posting.id);
            }
        }

        for row in tables.positions.values_mut() {
            if dead_postings.contains(&row.position.posting_id) {
                row.deleted = true;
            }
        }

        Ok(())
    }
}
