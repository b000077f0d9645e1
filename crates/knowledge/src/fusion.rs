//! Reciprocal Rank Fusion: score = Σ 1/(k + rank + 1)
//!
//! Fuses rankings by position only, so lexical and semantic scores never
//! have to be put on a common scale.

use crate::types::{sort_ranked, RankedResult};
use std::collections::BTreeMap;

/// Default damping constant.
pub const DEFAULT_RRF_K: u32 = 60;

/// Fuse any number of rankings.
///
/// The item at 0-based rank `r` of a list contributes `1 / (k + r + 1)` to
/// its id's total; input scores are ignored. An id repeated within one
/// list contributes once per occurrence. Output is descending by fused
/// score with ties broken by ascending id.
pub fn reciprocal_rank_fusion(rankings: &[&[RankedResult]], k: u32) -> Vec<RankedResult> {
    let mut totals: BTreeMap<usize, f64> = BTreeMap::new();

    for ranking in rankings {
        for (rank, item) in ranking.iter().enumerate() {
            *totals.entry(item.chunk_index).or_insert(0.0) +=
                1.0 / (k as f64 + rank as f64 + 1.0);
        }
    }

    let mut fused: Vec<RankedResult> = totals
        .into_iter()
        .map(|(id, score)| RankedResult::new(id, score))
        .collect();

    sort_ranked(&mut fused);
    fused
}

/// Fuse a lexical and a dense ranking.
///
/// # Example
/// ```
/// use grounded_knowledge::fusion::fuse;
/// use grounded_knowledge::RankedResult;
///
/// let a = [RankedResult::new(5, 9.0)];
/// let b = [RankedResult::new(2, 0.1)];
/// let fused = fuse(&a, &b, 60);
/// assert_eq!(fused[0].chunk_index, 2);
/// ```
pub fn fuse(a: &[RankedResult], b: &[RankedResult], k: u32) -> Vec<RankedResult> {
    reciprocal_rank_fusion(&[a, b], k)
}
