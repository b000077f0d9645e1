//! Immutable index snapshot for one ingested document.
//!
//! A snapshot bundles the chunk sequence with the indexes built from it.
//! It is never mutated after construction; re-ingestion builds a new one.

use crate::dense::DenseIndex;
use crate::lexical::LexicalIndex;
use crate::types::{Chunk, DocumentInfo};
use grounded_core::{AppError, AppResult};

#[derive(Debug)]
pub struct IndexSnapshot {
    document: DocumentInfo,
    chunks: Vec<Chunk>,
    lexical: Option<LexicalIndex>,
    dense: Option<DenseIndex>,
}

impl IndexSnapshot {
    /// Assemble a snapshot, checking that every present index covers exactly
    /// the given chunks.
    ///
    /// # Errors
    /// Returns `AppError::Knowledge` if there are no chunks, chunk indices
    /// are not `0..n` in order, or an index length differs from the chunk
    /// count.
    pub fn new(
        document: DocumentInfo,
        chunks: Vec<Chunk>,
        lexical: Option<LexicalIndex>,
        dense: Option<DenseIndex>,
    ) -> AppResult<Self> {
        if chunks.is_empty() {
            return Err(AppError::Knowledge(format!(
                "No chunks to index for '{}'",
                document.name
            )));
        }

        if let Some(chunk) = chunks.iter().enumerate().find(|(i, c)| c.index != *i) {
            return Err(AppError::Knowledge(format!(
                "Chunk at position {} has index {}",
                chunk.0, chunk.1.index
            )));
        }

        let expected = chunks.len();
        if let Some(lexical) = &lexical {
            check_len("Lexical", lexical.len(), expected)?;
        }
        if let Some(dense) = &dense {
            check_len("Dense", dense.len(), expected)?;
        }

        Ok(Self {
            document,
            chunks,
            lexical,
            dense,
        })
    }

    pub fn document(&self) -> &DocumentInfo {
        &self.document
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn lexical(&self) -> Option<&LexicalIndex> {
        self.lexical.as_ref()
    }

    pub fn dense(&self) -> Option<&DenseIndex> {
        self.dense.as_ref()
    }

    /// Embedding dimensions, or 0 without a dense index.
    pub fn embedding_dimensions(&self) -> usize {
        self.dense.as_ref().map(DenseIndex::dimensions).unwrap_or(0)
    }
}

fn check_len(kind: &str, actual: usize, expected: usize) -> AppResult<()> {
    if actual != expected {
        return Err(AppError::Knowledge(format!(
            "{} index covers {} chunks but the document has {}",
            kind, actual, expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        Chunk::sequence(texts.iter().map(|t| t.to_string()))
    }

    #[test]
    fn test_consistent_snapshot() {
        let texts = ["bir", "iki"];
        let snapshot = IndexSnapshot::new(
            DocumentInfo::new("doc", "bir iki"),
            chunks(&texts),
            Some(LexicalIndex::from_texts(&texts)),
            Some(DenseIndex::build(vec![vec![1.0], vec![0.5]]).unwrap()),
        )
        .unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.embedding_dimensions(), 1);
        assert_eq!(snapshot.chunk(1).unwrap().text, "iki");
    }

    #[test]
    fn test_mismatched_lexical_index_is_rejected() {
        let result = IndexSnapshot::new(
            DocumentInfo::new("doc", "bir iki"),
            chunks(&["bir", "iki"]),
            Some(LexicalIndex::from_texts(&["bir"])),
            None,
        );
        assert!(matches!(result, Err(AppError::Knowledge(_))));
    }

    #[test]
    fn test_mismatched_dense_index_is_rejected() {
        let result = IndexSnapshot::new(
            DocumentInfo::new("doc", "bir iki"),
            chunks(&["bir", "iki"]),
            None,
            Some(DenseIndex::build(vec![vec![1.0]; 3]).unwrap()),
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Dense index covers 3 chunks"));
    }

    #[test]
    fn test_empty_chunks_are_rejected() {
        let result = IndexSnapshot::new(DocumentInfo::new("doc", ""), Vec::new(), None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_order_chunks_are_rejected() {
        let mut shuffled = chunks(&["bir", "iki"]);
        shuffled.swap(0, 1);
        let result = IndexSnapshot::new(DocumentInfo::new("doc", ""), shuffled, None, None);
        assert!(result.is_err());
    }
}
