//! kensaku - Positional full-text search engine
//!
//! A small full-text search engine: it ingests documents, builds a
//! positional inverted index, and answers ranked keyword queries with
//! TF-IDF scoring and sentence snippets reconstructed from stored
//! term offsets.
//!
//! # Architecture
//!
//! Everything lives under **core** (transport-agnostic):
//!
//! - analysis: char filters → sentence splitter → tokenizer → word filters
//! - store: `IndexStore` contract over tokens, documents, sentences,
//!   postings and token positions, plus an in-memory implementation
//! - indexer: ingestion pipeline (replace-on-update per document)
//! - search: AND-intersection retrieval, TF-IDF ranking, pagination,
//!   snippet assembly
//! - services: the two-operation facade (`ingest`, `search`) a request
//!   layer wires into its transport
//!
//! # Example
//!
//! ```
//! use kensaku::{Config, Services};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> kensaku::Result<()> {
//! let services = Services::in_memory(Config::default());
//!
//! services.ingest("doc://intro", "Search engines rank documents.").await?;
//! let hits = services.search("ranking", 0, 10).await?;
//!
//! assert_eq!(hits[0].uri, "doc://intro");
//! # Ok(())
//! # }
//! ```

// Core engine logic (transport-agnostic)
pub mod core;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{KensakuError, Result};
pub use core::services::Services;
pub use core::store::{IndexStore, MemoryStore};
pub use core::types::*;
