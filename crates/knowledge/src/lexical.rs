//! BM25 (Okapi) lexical index over the chunk sequence.

use crate::types::{sort_ranked, RankedResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Split text into index terms: lower-cased, whitespace-separated.
///
/// Chunks and queries must go through this same function.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// BM25 Okapi parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term frequency saturation
    pub k1: f64,
    /// Length normalisation
    pub b: f64,
    /// Floor for negative IDF values, as a fraction of the mean IDF
    pub epsilon: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            epsilon: 0.25,
        }
    }
}

/// Immutable BM25 index built from tokenized chunks.
#[derive(Debug, Clone)]
pub struct LexicalIndex {
    params: Bm25Params,
    term_freqs: Vec<HashMap<String, u32>>,
    doc_lengths: Vec<usize>,
    avg_doc_length: f64,
    idf: HashMap<String, f64>,
}

impl LexicalIndex {
    /// Build with default parameters. Position `i` of `tokenized_chunks`
    /// becomes chunk index `i`.
    pub fn build(tokenized_chunks: &[Vec<String>]) -> Self {
        Self::with_params(tokenized_chunks, Bm25Params::default())
    }

    /// Tokenize and index raw chunk texts.
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t.as_ref())).collect();
        Self::build(&tokenized)
    }

    pub fn with_params(tokenized_chunks: &[Vec<String>], params: Bm25Params) -> Self {
        let doc_count = tokenized_chunks.len();
        let mut term_freqs = Vec::with_capacity(doc_count);
        let mut doc_lengths = Vec::with_capacity(doc_count);

        // Ordered so the IDF sum is reproducible
        let mut doc_freqs: BTreeMap<String, usize> = BTreeMap::new();

        for tokens in tokenized_chunks {
            let mut freqs: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *freqs.entry(token.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            doc_lengths.push(tokens.len());
            term_freqs.push(freqs);
        }

        let total_length: usize = doc_lengths.iter().sum();
        let avg_doc_length = if doc_count > 0 {
            total_length as f64 / doc_count as f64
        } else {
            0.0
        };

        let idf = compute_idf(doc_freqs, doc_count, params.epsilon);

        tracing::debug!(
            "Built lexical index: {} chunks, {} terms, avg length {:.1}",
            doc_count,
            idf.len(),
            avg_doc_length
        );

        Self {
            params,
            term_freqs,
            doc_lengths,
            avg_doc_length,
            idf,
        }
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.doc_lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }

    /// Score every chunk against a tokenized query.
    ///
    /// Returns one entry per chunk, sorted by descending score with ties
    /// broken by ascending chunk index. An empty index or an empty query
    /// yields an empty result.
    pub fn score(&self, query_tokens: &[String]) -> Vec<RankedResult> {
        if self.is_empty() || query_tokens.is_empty() {
            return Vec::new();
        }

        let Bm25Params { k1, b, .. } = self.params;

        let mut results: Vec<RankedResult> = self
            .term_freqs
            .iter()
            .zip(&self.doc_lengths)
            .enumerate()
            .map(|(chunk_index, (freqs, &length))| {
                let length_ratio = if self.avg_doc_length > 0.0 {
                    length as f64 / self.avg_doc_length
                } else {
                    0.0
                };
                let norm = k1 * (1.0 - b + b * length_ratio);

                let score: f64 = query_tokens
                    .iter()
                    .map(|term| {
                        let tf = freqs.get(term).copied().unwrap_or(0) as f64;
                        if tf == 0.0 {
                            return 0.0;
                        }
                        let idf = self.idf.get(term).copied().unwrap_or(0.0);
                        idf * (tf * (k1 + 1.0)) / (tf + norm)
                    })
                    .sum();

                RankedResult::new(chunk_index, score)
            })
            .collect();

        sort_ranked(&mut results);
        results
    }

    /// Score against raw query text using [`tokenize`].
    pub fn score_text(&self, query: &str) -> Vec<RankedResult> {
        self.score(&tokenize(query))
    }

    /// The first `n` entries of [`LexicalIndex::score_text`].
    pub fn top_n(&self, query: &str, n: usize) -> Vec<RankedResult> {
        let mut results = self.score_text(query);
        results.truncate(n);
        results
    }
}

/// Okapi IDF: `ln(N - df + 0.5) - ln(df + 0.5)`, with negative values
/// replaced by `epsilon` times the mean IDF.
fn compute_idf(
    doc_freqs: BTreeMap<String, usize>,
    doc_count: usize,
    epsilon: f64,
) -> HashMap<String, f64> {
    let n = doc_count as f64;
    let mut idf = HashMap::with_capacity(doc_freqs.len());
    let mut idf_sum = 0.0;
    let mut negative = Vec::new();

    for (term, df) in doc_freqs {
        let df = df as f64;
        let value = (n - df + 0.5).ln() - (df + 0.5).ln();
        idf_sum += value;
        if value < 0.0 {
            negative.push(term.clone());
        }
        idf.insert(term, value);
    }

    if !idf.is_empty() {
        let floor = epsilon * (idf_sum / idf.len() as f64);
        for term in negative {
            idf.insert(term, floor);
        }
    }

    idf
}
