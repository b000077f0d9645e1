//! Embedding collaborators.
//!
//! Asymmetric models (e5 family) expect documents and queries to carry
//! different prefixes. [`EmbeddingRole`] applies them, so indexed chunks
//! always go through [`embed_passages`] and queries through
//! [`embed_query`].

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};

use grounded_core::{AppError, AppResult};

/// Which side of the retrieval a text is embedded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingRole {
    Passage,
    Query,
}

impl EmbeddingRole {
    pub fn prefix<'a>(&self, config: &'a EmbeddingConfig) -> &'a str {
        match self {
            Self::Passage => &config.passage_prefix,
            Self::Query => &config.query_prefix,
        }
    }

    /// Prepend this role's prefix to `text`.
    pub fn apply(&self, text: &str, config: &EmbeddingConfig) -> String {
        format!("{}{}", self.prefix(config), text)
    }
}

/// Embed chunk texts in `batch_size` batches with the passage prefix.
///
/// # Errors
/// Fails if the provider errors or returns the wrong number of vectors.
pub async fn embed_passages(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    config: &EmbeddingConfig,
) -> AppResult<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!(
        "Embedding {} passages using provider '{}' (model: {})",
        texts.len(),
        provider.provider_name(),
        provider.model_name()
    );

    let batch_size = config.batch_size.max(1);
    let mut vectors = Vec::with_capacity(texts.len());

    for (batch_index, batch) in texts.chunks(batch_size).enumerate() {
        let prefixed: Vec<String> = batch
            .iter()
            .map(|t| EmbeddingRole::Passage.apply(t, config))
            .collect();

        let embedded = provider.embed_batch(&prefixed).await?;
        if embedded.len() != batch.len() {
            return Err(AppError::Embedding(format!(
                "Provider returned {} vectors for {} texts",
                embedded.len(),
                batch.len()
            )));
        }

        vectors.extend(embedded);
        tracing::debug!(
            "Embedded batch {} ({}/{} passages)",
            batch_index + 1,
            vectors.len(),
            texts.len()
        );
    }

    Ok(vectors)
}

/// Embed a query with the query prefix.
pub async fn embed_query(
    provider: &dyn EmbeddingProvider,
    query: &str,
    config: &EmbeddingConfig,
) -> AppResult<Vec<f32>> {
    provider
        .embed(&EmbeddingRole::Query.apply(query, config))
        .await
}
