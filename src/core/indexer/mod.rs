//! Document indexing module.
//!
//! Orchestrates ingestion: sentence splitting, normalization,
//! position-list construction and index-store writes. Re-ingesting a
//! URI replaces the document's sentences, postings and positions
//! wholesale; the document row itself (and its id) is stable.

pub mod pipeline;

pub use pipeline::IndexingPipeline;
