//! Dense vector index using cosine similarity.

use crate::types::{sort_ranked, RankedResult};
use grounded_core::{AppError, AppResult};

/// Cosine similarity of two vectors.
///
/// Returns `0.0` when either vector has zero norm or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    cosine_with_norms(a, norm(a), b, norm(b))
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt()
}

fn cosine_with_norms(a: &[f32], norm_a: f64, b: &[f32], norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    dot / (norm_a * norm_b)
}

/// Exhaustive cosine index, one vector per chunk.
#[derive(Debug, Clone)]
pub struct DenseIndex {
    vectors: Vec<Vec<f32>>,
    norms: Vec<f64>,
    dimensions: usize,
}

impl DenseIndex {
    /// Build from chunk vectors; position `i` becomes chunk index `i`.
    ///
    /// # Errors
    /// Returns `AppError::Knowledge` if the vectors disagree on length.
    pub fn build(vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        let dimensions = vectors.first().map(Vec::len).unwrap_or(0);

        if let Some((i, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimensions)
        {
            return Err(AppError::Knowledge(format!(
                "Vector {} has {} dimensions, expected {}",
                i,
                v.len(),
                dimensions
            )));
        }

        let norms = vectors.iter().map(|v| norm(v)).collect();

        tracing::debug!(
            "Built dense index: {} vectors, {} dimensions",
            vectors.len(),
            dimensions
        );

        Ok(Self {
            vectors,
            norms,
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Rank chunks by cosine similarity to `vector`.
    ///
    /// Returns at most `top_k` results, descending by similarity with ties
    /// broken by ascending chunk index.
    ///
    /// # Errors
    /// Returns `AppError::Embedding` if `vector` has the wrong dimensions.
    pub fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<RankedResult>> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        if vector.len() != self.dimensions {
            return Err(AppError::Embedding(format!(
                "Query vector has {} dimensions, index has {}",
                vector.len(),
                self.dimensions
            )));
        }

        let query_norm = norm(vector);
        let mut results: Vec<RankedResult> = self
            .vectors
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(i, (v, &n))| RankedResult::new(i, cosine_with_norms(vector, query_norm, v, n)))
            .collect();

        sort_ranked(&mut results);
        results.truncate(top_k);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> DenseIndex {
        DenseIndex::build(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.7, 0.7, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_vector_similarity_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_length_mismatch_similarity_is_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_query_ranks_by_similarity() {
        let results = index().query(&[1.0, 0.1, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk_index, 0);
        assert_eq!(results[1].chunk_index, 2);
    }

    #[test]
    fn test_top_k_beyond_len_returns_all() {
        let results = index().query(&[0.0, 1.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 4);
        // Zero vector chunk scores 0.0 and ties with the orthogonal chunk 0
        assert_eq!(results[2].chunk_index, 0);
        assert_eq!(results[3].chunk_index, 3);
    }

    #[test]
    fn test_zero_query_vector_ties_in_index_order() {
        let results = index().query(&[0.0, 0.0, 0.0], 4).unwrap();
        let order: Vec<usize> = results.iter().map(|r| r.chunk_index).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        assert!(matches!(
            index().query(&[1.0, 0.0], 3),
            Err(AppError::Embedding(_))
        ));
    }

    #[test]
    fn test_inconsistent_build_is_error() {
        let result = DenseIndex::build(vec![vec![1.0, 0.0], vec![1.0]]);
        assert!(matches!(result, Err(AppError::Knowledge(_))));
    }

    #[test]
    fn test_empty_index() {
        let empty = DenseIndex::build(Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert!(empty.query(&[1.0], 5).unwrap().is_empty());
    }
}
