//! RAG (Retrieval-Augmented Generation) answering with audited citations.

pub mod ask;
pub mod conversation;
pub mod types;

pub use ask::{AskOptions, GenerationSettings, RagPipeline};
pub use conversation::Conversation;
pub use types::{AnswerStatus, RagResponse};
