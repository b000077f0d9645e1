//! RAG response types.

use crate::audit::{GroundingReport, SourceListing, ValidationResult};
use crate::types::RetrievedChunk;
use serde::{Deserialize, Serialize};

/// How far the pipeline got for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    /// No document has been ingested yet
    NotReady,
    /// Retrieval returned nothing
    NoInformation,
    /// The model produced an answer, audited below
    Answered,
}

/// Answer plus everything needed to judge it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    pub status: AnswerStatus,

    pub answer: String,

    /// Chunks supplied to the model; source `n` is `sources[n - 1]`
    pub sources: Vec<RetrievedChunk>,

    #[serde(rename = "sourceListing")]
    pub source_listing: SourceListing,

    /// Distinct cited numbers in first-seen order
    #[serde(rename = "citationIds")]
    pub citation_ids: Vec<usize>,

    pub validation: Option<ValidationResult>,

    /// Absent when grounding verification was not requested
    pub grounding: Option<GroundingReport>,
}

impl RagResponse {
    /// Response for a question asked before any ingestion.
    pub fn not_ready() -> Self {
        Self::without_answer(
            AnswerStatus::NotReady,
            "No document has been ingested yet. Please ingest a document first.".to_string(),
        )
    }

    /// Response when retrieval found nothing for the query.
    pub fn no_information(query: &str) -> Self {
        Self::without_answer(
            AnswerStatus::NoInformation,
            format!(
                "I could not find information about \"{}\" in the ingested document.",
                query
            ),
        )
    }

    fn without_answer(status: AnswerStatus, answer: String) -> Self {
        Self {
            status,
            answer,
            sources: Vec::new(),
            source_listing: SourceListing::default(),
            citation_ids: Vec::new(),
            validation: None,
            grounding: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.status == AnswerStatus::Answered
    }
}
