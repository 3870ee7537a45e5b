//! Core engine logic (transport-agnostic)
//!
//! This module contains all indexing and retrieval logic that is
//! independent of whatever request layer sits in front of it.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + defaults)
//! - **error**: Error types and Result alias
//! - **types**: Index entities and result types
//! - **analysis**: Normalization pipeline (char filters, splitter, tokenizer, word filters)
//! - **store**: Index storage contract and in-memory implementation
//! - **indexer**: Document ingestion pipeline
//! - **search**: TF-IDF ranked retrieval
//! - **services**: Unified service container

pub mod analysis;
pub mod config;
pub mod error;
pub mod indexer;
pub mod search;
pub mod services;
pub mod store;
pub mod types;

// Re-export key types for convenience
pub use config::Config;
pub use error::{KensakuError, Result};
pub use services::Services;
