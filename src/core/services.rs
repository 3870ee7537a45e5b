//! Unified service container for kensaku.
//!
//! Builds the analyzer chains from configuration once and shares them
//! between ingestion and search, so both sides normalize text
//! identically.

use crate::core::analysis::Analyzer;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::indexer::IndexingPipeline;
use crate::core::search::SearchService;
use crate::core::store::{IndexStore, MemoryStore};
use crate::core::types::{IngestStats, SearchHit};
use std::sync::Arc;

/// Unified services container
///
/// This is the engine's whole external surface: [`Services::ingest`]
/// and [`Services::search`], for the caller's request layer to wire
/// into whatever transport it speaks.
#[derive(Clone)]
pub struct Services {
    /// Index storage backend
    pub store: Arc<dyn IndexStore>,

    /// Ingestion pipeline
    pub indexer: Arc<IndexingPipeline>,

    /// TF-IDF search service
    pub searcher: Arc<SearchService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration and a storage backend
    pub fn new(config: Config, store: Arc<dyn IndexStore>) -> Self {
        let analyzer = Arc::new(Analyzer::from_config(&config.analysis));

        let indexer = Arc::new(IndexingPipeline::new(
            Arc::clone(&analyzer),
            Arc::clone(&store),
        ));
        let searcher = Arc::new(SearchService::new(
            analyzer,
            Arc::clone(&store),
            &config.search,
        ));

        Self {
            store,
            indexer,
            searcher,
            config: Arc::new(config),
        }
    }

    /// Create services backed by the in-memory store
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Ingest (or re-ingest) one document. Idempotent per URI.
    pub async fn ingest(&self, uri: &str, body: &str) -> Result<IngestStats> {
        self.indexer.ingest(uri, body).await
    }

    /// Ranked keyword search with pagination.
    pub async fn search(
        &self,
        query: &str,
        offset: usize,
        count: usize,
    ) -> Result<Vec<SearchHit>> {
        self.searcher.search(query, offset, count).await
    }
}
