//! Knowledge base types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A retrievable chunk of the ingested document.
///
/// `index` is the chunk's 0-based position in the chunk sequence and is the
/// identifier used by both sub-indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

impl Chunk {
    /// Assign sequential indices to chunk texts.
    pub fn sequence<I>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Self { index, text })
            .collect()
    }
}

/// A `(chunk_index, score)` pair produced by a ranking step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub chunk_index: usize,
    pub score: f64,
}

impl RankedResult {
    pub fn new(chunk_index: usize, score: f64) -> Self {
        Self { chunk_index, score }
    }
}

/// Sort descending by score, ascending by chunk index on ties.
pub(crate) fn sort_ranked(results: &mut [RankedResult]) {
    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.chunk_index.cmp(&b.chunk_index))
    });
}

/// A chunk returned by hybrid retrieval, in fused order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    #[serde(rename = "chunkIndex")]
    pub chunk_index: usize,
    pub text: String,
    /// Reciprocal rank fusion score
    pub score: f64,
}

/// Identity of the document behind a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub name: String,

    /// Hex SHA-256 of the cleaned text
    pub fingerprint: String,

    #[serde(rename = "charCount")]
    pub char_count: usize,

    #[serde(rename = "ingestedAt")]
    pub ingested_at: DateTime<Utc>,
}

impl DocumentInfo {
    pub fn new(name: impl Into<String>, cleaned_text: &str) -> Self {
        Self {
            name: name.into(),
            fingerprint: fingerprint(cleaned_text),
            char_count: cleaned_text.chars().count(),
            ingested_at: Utc::now(),
        }
    }
}

/// Hex-encoded SHA-256 digest of `text`.
pub fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Statistics from one ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    #[serde(rename = "documentName")]
    pub document_name: String,

    #[serde(rename = "totalChunks")]
    pub total_chunks: usize,

    #[serde(rename = "totalCharacters")]
    pub total_characters: usize,

    /// 0 when ingested without an embedding provider
    #[serde(rename = "embeddingDimensions")]
    pub embedding_dimensions: usize,

    pub fingerprint: String,

    #[serde(rename = "durationSecs")]
    pub duration_secs: f64,
}

/// Current state of a knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeStats {
    #[serde(rename = "documentName")]
    pub document_name: Option<String>,

    #[serde(rename = "totalChunks")]
    pub total_chunks: usize,

    #[serde(rename = "totalQueries")]
    pub total_queries: u64,

    pub indexed: bool,

    #[serde(rename = "embeddingDimensions")]
    pub embedding_dimensions: usize,

    #[serde(rename = "ingestedAt")]
    pub ingested_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_sequence_is_zero_based() {
        let chunks = Chunk::sequence(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[1].index, 1);
        assert_eq!(chunks[1].text, "b");
    }

    #[test]
    fn test_sort_ranked_breaks_ties_by_index() {
        let mut results = vec![
            RankedResult::new(4, 0.5),
            RankedResult::new(1, 0.9),
            RankedResult::new(2, 0.5),
        ];
        sort_ranked(&mut results);

        let order: Vec<usize> = results.iter().map(|r| r.chunk_index).collect();
        assert_eq!(order, vec![1, 2, 4]);
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let a = fingerprint("Parasetamol ateş düşürür.");
        let b = fingerprint("Parasetamol ateş düşürür.");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, fingerprint("Ibuprofen"));
    }

    #[test]
    fn test_document_info_counts_chars_not_bytes() {
        let info = DocumentInfo::new("doc.txt", "şüç");
        assert_eq!(info.char_count, 3);
    }
}
