//! Command handlers for the Grounded CLI.
//!
//! The index lives in memory, so every command that queries a document
//! ingests it first through a [`Session`].

pub mod ask;
pub mod audit;
pub mod chat;
pub mod ingest;
pub mod search;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use audit::AuditCommand;
pub use chat::ChatCommand;
pub use ingest::IngestCommand;
pub use search::SearchCommand;

use grounded_core::{config::AppConfig, AppResult};
use grounded_knowledge::{
    create_provider, EmbeddingProvider, GenerationSettings, IngestStats, KnowledgeBase,
};
use std::path::Path;
use std::sync::Arc;

/// A knowledge base plus the embedding provider its configuration names.
pub(crate) struct Session {
    pub kb: KnowledgeBase,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Session {
    pub async fn open(config: &AppConfig) -> AppResult<Self> {
        let kb = KnowledgeBase::open(&config.workspace)?;
        let embedder = create_provider(&kb.config().embedding).await?;
        Ok(Self { kb, embedder })
    }

    /// Open a session and ingest `path` into it.
    pub async fn with_document(config: &AppConfig, path: &Path) -> AppResult<(Self, IngestStats)> {
        let session = Self::open(config).await?;
        let stats = session.kb.ingest_file(path, session.embedder()).await?;
        Ok((session, stats))
    }

    pub fn embedder(&self) -> Option<&dyn EmbeddingProvider> {
        Some(self.embedder.as_ref())
    }

    /// Requested `top_k`, or the configured default.
    pub fn top_k(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.kb.config().retrieval.top_k)
    }
}

pub(crate) fn generation_settings(config: &AppConfig) -> GenerationSettings {
    GenerationSettings {
        model: config.model.clone(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..Default::default()
    }
}

pub(crate) fn print_json(value: &serde_json::Value) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
