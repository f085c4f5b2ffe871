//! Ranking of vector-index hits for image search.
//!
//! The index returns a distance-like score: lower is more similar.

use serde::{Deserialize, Serialize};

/// Hits scoring above this are not considered a match for the query image.
pub const SIMILARITY_THRESHOLD: f64 = 500.0;

/// Default number of neighbours requested from the index.
pub const DEFAULT_TOP_K: u32 = 5;

/// Upper bound on neighbours a client may request.
pub const MAX_TOP_K: u32 = 50;

/// One neighbour returned by the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityHit {
    pub id: String,
    pub score: f64,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Sort hits ascending by score; NaN scores sink to the end.
pub fn rank(mut hits: Vec<SimilarityHit>) -> Vec<SimilarityHit> {
    hits.sort_by(|a, b| a.score.total_cmp(&b.score));
    hits
}

/// The closest hit, if it is within [`SIMILARITY_THRESHOLD`].
pub fn best_match(hits: &[SimilarityHit]) -> Option<&SimilarityHit> {
    hits.iter()
        .filter(|h| h.score.is_finite())
        .min_by(|a, b| a.score.total_cmp(&b.score))
        .filter(|h| h.score <= SIMILARITY_THRESHOLD)
}

/// Clamp a requested `top_k` to `1..=MAX_TOP_K`.
pub fn clamp_top_k(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_TOP_K).clamp(1, MAX_TOP_K)
}
