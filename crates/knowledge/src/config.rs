//! Knowledge base configuration management.
//!
//! Every section is optional in `.grounded/knowledge.yaml`; missing fields
//! take the defaults below.

use crate::embeddings::EmbeddingConfig;
use grounded_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Function words ignored when measuring grounding overlap.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "ve", "veya", "ile", "bir", "bu", "şu", "o", "için", "da", "de", "mi", "mu", "mü", "ki", "ne",
    "kadar", "gibi", "daha", "çok", "az",
];

/// Full knowledge base configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub grounding: GroundingConfig,
    pub display: DisplayConfig,
    pub conversation: ConversationConfig,
    pub embedding: EmbeddingConfig,
}

/// Chunk window settings, in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            size: 500,
            overlap: 50,
        }
    }
}

/// Hybrid retrieval settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,

    /// Reciprocal rank fusion damping constant
    pub rrf_k: u32,

    /// Each sub-index is asked for `top_k * candidate_multiplier` candidates
    pub candidate_multiplier: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            rrf_k: crate::fusion::DEFAULT_RRF_K,
            candidate_multiplier: 2,
        }
    }
}

/// Lexical grounding heuristic settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingConfig {
    /// Fraction of a sentence's content words that must appear in one chunk
    pub overlap_threshold: f64,

    /// Minimum grounded-sentence ratio for a well-grounded answer
    pub well_grounded_threshold: f64,

    /// Sentences with fewer content words are not scored
    pub min_content_words: usize,

    /// Shorter words are not content words
    pub min_word_chars: usize,

    pub stop_words: Vec<String>,
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.25,
            well_grounded_threshold: 0.65,
            min_content_words: 3,
            min_word_chars: 3,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Source listing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub preview_chars: usize,
    pub max_display: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_chars: 250,
            max_display: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Prior turns included in each prompt
    pub history_turns: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self { history_turns: 3 }
    }
}

impl KnowledgeConfig {
    /// Check the settings that would otherwise fail deep inside a pipeline.
    pub fn validate(&self) -> AppResult<()> {
        crate::chunker::validate_window(self.chunking.size, self.chunking.overlap)?;

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }

        if self.retrieval.candidate_multiplier == 0 {
            return Err(AppError::Config(
                "retrieval.candidate_multiplier must be at least 1".to_string(),
            ));
        }

        for (name, value) in [
            ("grounding.overlap_threshold", self.grounding.overlap_threshold),
            (
                "grounding.well_grounded_threshold",
                self.grounding.well_grounded_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::Config(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding.dimensions must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load knowledge configuration.
///
/// Loads from `.grounded/knowledge.yaml` if it exists, otherwise returns the
/// defaults. The result is validated either way.
pub fn load_config(workspace: &Path) -> AppResult<KnowledgeConfig> {
    let config_path = get_config_path(workspace);

    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read config at {:?}: {}", config_path, e))
        })?;

        let config: KnowledgeConfig = serde_yaml::from_str(&content).map_err(|e| {
            AppError::Knowledge(format!("Failed to parse config at {:?}: {}", config_path, e))
        })?;

        tracing::debug!("Loaded knowledge config from {:?}", config_path);
        config
    } else {
        tracing::debug!("Using default knowledge config (no config file found)");
        KnowledgeConfig::default()
    };

    config.validate()?;
    Ok(config)
}

/// Save knowledge configuration.
pub fn save_config(workspace: &Path, config: &KnowledgeConfig) -> AppResult<()> {
    let config_path = get_config_path(workspace);

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Knowledge(format!("Failed to create config directory: {}", e))
        })?;
    }

    let yaml = serde_yaml::to_string(config)
        .map_err(|e| AppError::Knowledge(format!("Failed to serialize config: {}", e)))?;

    fs::write(&config_path, yaml).map_err(|e| {
        AppError::Knowledge(format!("Failed to write config to {:?}: {}", config_path, e))
    })?;

    tracing::debug!("Saved knowledge config to {:?}", config_path);
    Ok(())
}

/// Get the path to the knowledge config file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".grounded").join("knowledge.yaml")
}
