//! Hybrid retrieval over one snapshot.

use crate::config::RetrievalConfig;
use crate::fusion::fuse;
use crate::snapshot::IndexSnapshot;
use crate::types::{RankedResult, RetrievedChunk};

/// Retrieve up to `top_k` chunks for `query` from `snapshot`.
///
/// Each sub-index is asked for `top_k * candidate_multiplier` candidates
/// and the two lists are fused with reciprocal rank fusion. A missing
/// sub-index, a missing query vector or a dense query error contributes
/// an empty list instead of failing the retrieval.
pub fn hybrid_search(
    snapshot: &IndexSnapshot,
    query: &str,
    query_vector: Option<&[f32]>,
    top_k: usize,
    config: &RetrievalConfig,
) -> Vec<RetrievedChunk> {
    if top_k == 0 {
        return Vec::new();
    }

    let candidates = top_k.saturating_mul(config.candidate_multiplier.max(1));

    let lexical: Vec<RankedResult> = snapshot
        .lexical()
        .map(|index| index.top_n(query, candidates))
        .unwrap_or_default();

    let dense: Vec<RankedResult> = match (snapshot.dense(), query_vector) {
        (Some(index), Some(vector)) => match index.query(vector, candidates) {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Dense retrieval skipped: {}", e);
                Vec::new()
            }
        },
        _ => Vec::new(),
    };

    tracing::debug!(
        lexical_candidates = lexical.len(),
        dense_candidates = dense.len(),
        "Fusing candidate lists"
    );

    fuse(&lexical, &dense, config.rrf_k)
        .into_iter()
        .filter_map(|result| {
            snapshot.chunk(result.chunk_index).map(|chunk| RetrievedChunk {
                chunk_index: chunk.index,
                text: chunk.text.clone(),
                score: result.score,
            })
        })
        .take(top_k)
        .collect()
}
