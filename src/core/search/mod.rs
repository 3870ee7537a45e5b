//! Search module for TF-IDF ranked retrieval.
//!
//! Queries run through the same normalization pipeline as documents,
//! then postings are intersected across all resolved query tokens
//! (strict AND), scored with TF-IDF, ranked, paginated, and returned
//! with snippet sentences reconstructed from stored term offsets.

mod engine;
mod tfidf;

pub use engine::SearchService;
pub use tfidf::{idf, tf};
