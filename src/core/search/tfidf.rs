//! TF-IDF scoring primitives.

/// Inverse document frequency: `ln(n / (posting_count + 1))`.
///
/// The +1 keeps the denominator non-zero; a term present in nearly
/// every document scores near (or below) zero.
pub fn idf(corpus_size: u64, posting_count: usize) -> f64 {
    (corpus_size as f64 / (posting_count as f64 + 1.0)).ln()
}

/// Term frequency: the token's posting count over the document's
/// total term count. Zero for an empty document.
pub fn tf(posting_count: usize, document_term_count: u64) -> f64 {
    if document_term_count == 0 {
        return 0.0;
    }
    posting_count as f64 / document_term_count as f64
}
