//! Prompt system for cited answer generation.
//!
//! This crate turns retrieved passages into the input of the generation
//! collaborator:
//! - YAML prompt definitions (workspace overrides or the built-in default)
//! - Handlebars rendering of numbered sources
//! - A bounded window of prior conversation turns

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_cited_prompt;
pub use loader::{list_prompts, load_prompt, DEFAULT_PROMPT_ID};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, ConversationTurn, PromptBehavior, PromptContextConfig,
    PromptDefinition, PromptOutputSpec, SourcePassage,
};
