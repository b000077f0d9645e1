//! Hybrid retrieval and citation auditing over one ingested document.
//!
//! A document is cleaned, chunked and indexed twice: a BM25 lexical index
//! and a dense cosine index over externally computed embeddings. Queries
//! fuse both rankings with reciprocal rank fusion, and generated answers
//! are audited against the numbered chunks they were given.
//!
//! The indexes for the current document live in one immutable
//! [`IndexSnapshot`]. Ingestion builds a complete new snapshot and swaps it
//! in, so a query always sees chunks and vectors from the same document.

pub mod audit;
pub mod chunker;
pub mod config;
pub mod dense;
pub mod embeddings;
pub mod fusion;
pub mod lexical;
pub mod parser;
pub mod rag;
pub mod retriever;
pub mod snapshot;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use audit::{
    extract_citations, format_sources, validate_citations, verify_grounding, CitationPattern,
    GroundingReport, SourceEntry, SourceListing, ValidationResult,
};
pub use config::KnowledgeConfig;
pub use embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
pub use fusion::{fuse, DEFAULT_RRF_K};
pub use rag::{AnswerStatus, AskOptions, Conversation, GenerationSettings, RagPipeline, RagResponse};
pub use snapshot::IndexSnapshot;
pub use types::{
    Chunk, DocumentInfo, IngestStats, KnowledgeStats, RankedResult, RetrievedChunk,
};

use dense::DenseIndex;
use grounded_core::{AppError, AppResult};
use lexical::LexicalIndex;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

/// The current document's indexes plus usage counters.
///
/// Shared by reference across concurrent queries; readers clone the
/// snapshot handle and never hold the lock while retrieving.
#[derive(Debug)]
pub struct KnowledgeBase {
    config: KnowledgeConfig,
    current: RwLock<Option<Arc<IndexSnapshot>>>,
    total_queries: AtomicU64,
}

impl KnowledgeBase {
    /// Create an empty knowledge base.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the configuration is invalid.
    pub fn new(config: KnowledgeConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            current: RwLock::new(None),
            total_queries: AtomicU64::new(0),
        })
    }

    /// Create an empty knowledge base configured from
    /// `.grounded/knowledge.yaml` in `workspace`.
    pub fn open(workspace: &Path) -> AppResult<Self> {
        Self::new(config::load_config(workspace)?)
    }

    pub fn config(&self) -> &KnowledgeConfig {
        &self.config
    }

    /// Handle to the current snapshot, if a document has been ingested.
    pub fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_indexed(&self) -> bool {
        self.snapshot().is_some()
    }

    pub(crate) fn publish(&self, snapshot: IndexSnapshot) -> Arc<IndexSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Drop the current snapshot. In-flight queries keep their handle.
    pub fn clear(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(snapshot) = previous {
            tracing::info!("Cleared index for '{}'", snapshot.document().name);
        }
    }

    /// Replace the current document with `raw_text`.
    ///
    /// Cleans and chunks the text, then builds the lexical index on a
    /// blocking task while the passages are embedded. Without an
    /// `embedder` the snapshot is lexical only.
    ///
    /// # Errors
    /// Chunking parameter errors are `AppError::Config`. An empty document
    /// or a vector count or dimension mismatch is `AppError::Knowledge`.
    /// Embedding failures propagate. On any error the previous snapshot
    /// stays current.
    pub async fn ingest(
        &self,
        document_name: &str,
        raw_text: &str,
        embedder: Option<&dyn EmbeddingProvider>,
    ) -> AppResult<IngestStats> {
        let start = Instant::now();

        tracing::info!("Starting ingestion of '{}'", document_name);

        let cleaned = parser::clean_text(raw_text);
        let texts = chunker::chunk_text(
            &cleaned,
            self.config.chunking.size,
            self.config.chunking.overlap,
        )?;

        if texts.is_empty() {
            return Err(AppError::Knowledge(format!(
                "Document '{}' produced no chunks",
                document_name
            )));
        }

        tracing::debug!("Chunked '{}' into {} chunks", document_name, texts.len());

        let lexical_texts = texts.clone();
        let lexical_task =
            tokio::task::spawn_blocking(move || LexicalIndex::from_texts(&lexical_texts));

        let dense = match embedder {
            Some(provider) => Some(self.build_dense(provider, &texts).await?),
            None => {
                tracing::warn!("No embedding provider, '{}' is indexed lexically only", document_name);
                None
            }
        };

        let lexical = lexical_task
            .await
            .map_err(|e| AppError::Knowledge(format!("Lexical index build failed: {}", e)))?;

        let document = DocumentInfo::new(document_name, &cleaned);
        let snapshot = IndexSnapshot::new(document, Chunk::sequence(texts), Some(lexical), dense)?;

        let stats = IngestStats {
            document_name: snapshot.document().name.clone(),
            total_chunks: snapshot.len(),
            total_characters: snapshot.document().char_count,
            embedding_dimensions: snapshot.embedding_dimensions(),
            fingerprint: snapshot.document().fingerprint.clone(),
            duration_secs: start.elapsed().as_secs_f64(),
        };

        self.publish(snapshot);

        tracing::info!(
            "Ingestion completed: '{}', {} chunks, {} characters in {:.2}s",
            stats.document_name,
            stats.total_chunks,
            stats.total_characters,
            stats.duration_secs
        );

        Ok(stats)
    }

    async fn build_dense(
        &self,
        provider: &dyn EmbeddingProvider,
        texts: &[String],
    ) -> AppResult<DenseIndex> {
        let vectors = embeddings::embed_passages(provider, texts, &self.config.embedding).await?;

        if vectors.len() != texts.len() {
            return Err(AppError::Knowledge(format!(
                "Got {} embeddings for {} chunks",
                vectors.len(),
                texts.len()
            )));
        }

        let index = DenseIndex::build(vectors)?;
        if index.dimensions() != provider.dimensions() {
            return Err(AppError::Knowledge(format!(
                "Provider '{}' declares {} dimensions but returned {}",
                provider.provider_name(),
                provider.dimensions(),
                index.dimensions()
            )));
        }

        Ok(index)
    }

    /// Read `path` and ingest it under its file name.
    pub async fn ingest_file(
        &self,
        path: &Path,
        embedder: Option<&dyn EmbeddingProvider>,
    ) -> AppResult<IngestStats> {
        let text = parser::read_document(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.ingest(&name, &text, embedder).await
    }

    /// Hybrid retrieval against the current snapshot.
    ///
    /// Returns an empty list when nothing has been ingested.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        embedder: Option<&dyn EmbeddingProvider>,
    ) -> Vec<RetrievedChunk> {
        match self.snapshot() {
            Some(snapshot) => self.retrieve_in(&snapshot, query, top_k, embedder).await,
            None => {
                tracing::debug!("Retrieval requested before any ingestion");
                Vec::new()
            }
        }
    }

    /// Hybrid retrieval against a snapshot the caller already holds.
    ///
    /// The query is embedded only when the snapshot has a dense index; an
    /// embedding failure drops the dense signal for this query.
    pub async fn retrieve_in(
        &self,
        snapshot: &IndexSnapshot,
        query: &str,
        top_k: usize,
        embedder: Option<&dyn EmbeddingProvider>,
    ) -> Vec<RetrievedChunk> {
        let query_vector = match (snapshot.dense(), embedder) {
            (Some(_), Some(provider)) => {
                match embeddings::embed_query(provider, query, &self.config.embedding).await {
                    Ok(vector) => Some(vector),
                    Err(e) => {
                        tracing::warn!("Query embedding failed, using lexical signal only: {}", e);
                        None
                    }
                }
            }
            (Some(_), None) => {
                tracing::warn!("Dense index present but no embedding provider given");
                None
            }
            (None, _) => None,
        };

        retriever::hybrid_search(
            snapshot,
            query,
            query_vector.as_deref(),
            top_k,
            &self.config.retrieval,
        )
    }

    /// Count one answered question.
    pub fn record_query(&self) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> KnowledgeStats {
        let snapshot = self.snapshot();
        KnowledgeStats {
            document_name: snapshot.as_ref().map(|s| s.document().name.clone()),
            total_chunks: snapshot.as_ref().map_or(0, |s| s.len()),
            total_queries: self.total_queries.load(Ordering::Relaxed),
            indexed: snapshot.is_some(),
            embedding_dimensions: snapshot.as_ref().map_or(0, |s| s.embedding_dimensions()),
            ingested_at: snapshot.as_ref().map(|s| s.document().ingested_at),
        }
    }
}
