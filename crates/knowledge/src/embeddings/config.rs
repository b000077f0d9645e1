//! Embedding configuration.

use grounded_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Embedding settings, the `embedding` section of the knowledge config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider name: "trigram" or "ollama"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Prepended to every chunk before embedding
    pub passage_prefix: String,

    /// Prepended to every query before embedding
    pub query_prefix: String,

    /// Provider endpoint; `OLLAMA_URL` or the local default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Maximum number of texts per provider call
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            passage_prefix: "passage: ".to_string(),
            query_prefix: "query: ".to_string(),
            endpoint: None,
            batch_size: 32,
        }
    }
}

impl EmbeddingConfig {
    /// Check that vectors from a provider fit this configuration.
    pub fn check_dimensions(&self, actual: usize) -> AppResult<()> {
        if actual != self.dimensions {
            return Err(AppError::Embedding(format!(
                "Dimension mismatch: provider '{}' returned {}, configured {}",
                self.provider, actual, self.dimensions
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.provider, "trigram");
        assert_eq!(config.dimensions, 384);
        assert_eq!(config.passage_prefix, "passage: ");
        assert_eq!(config.query_prefix, "query: ");
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_yaml_section_with_partial_fields() {
        let yaml = "provider: ollama\nmodel: multilingual-e5-small\n";
        let config: EmbeddingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "multilingual-e5-small");
        assert_eq!(config.batch_size, 32);
    }

    #[test]
    fn test_check_dimensions() {
        let config = EmbeddingConfig::default();
        assert!(config.check_dimensions(384).is_ok());

        let err = config.check_dimensions(768).unwrap_err();
        assert!(err.to_string().contains("Dimension mismatch"));
    }
}
