//! Cited answering: retrieve, generate, audit.

use crate::audit::{format_sources, verify_grounding_with, CitationPattern};
use crate::embeddings::EmbeddingProvider;
use crate::rag::types::{AnswerStatus, RagResponse};
use crate::KnowledgeBase;
use grounded_core::AppResult;
use grounded_llm::{LlmClient, LlmRequest};
use grounded_prompt::{build_cited_prompt, ConversationTurn, PromptDefinition, SourcePassage};

/// Sampling settings for the generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "llama3.1".to_string(),
            temperature: 0.3,
            max_tokens: 512,
            top_p: 0.9,
        }
    }
}

/// Per-question options.
#[derive(Debug, Clone)]
pub struct AskOptions {
    /// Overrides the configured `retrieval.top_k`
    pub top_k: Option<usize>,

    /// Compute a grounding report for the answer
    pub verify_grounding: bool,
}

impl Default for AskOptions {
    fn default() -> Self {
        Self {
            top_k: None,
            verify_grounding: true,
        }
    }
}

/// Everything one question needs, borrowed from the caller.
pub struct RagPipeline<'a> {
    kb: &'a KnowledgeBase,
    llm: &'a dyn LlmClient,
    prompt: &'a PromptDefinition,
    embedder: Option<&'a dyn EmbeddingProvider>,
    generation: GenerationSettings,
}

impl<'a> RagPipeline<'a> {
    pub fn new(kb: &'a KnowledgeBase, llm: &'a dyn LlmClient, prompt: &'a PromptDefinition) -> Self {
        Self {
            kb,
            llm,
            prompt,
            embedder: None,
            generation: GenerationSettings::default(),
        }
    }

    /// Use `embedder` for the dense half of retrieval.
    pub fn with_embedder(mut self, embedder: Option<&'a dyn EmbeddingProvider>) -> Self {
        self.embedder = embedder;
        self
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    /// Answer `query` from the current snapshot.
    ///
    /// Returns a `NotReady` response before any ingestion and a
    /// `NoInformation` response when retrieval finds nothing. Otherwise the
    /// retrieved chunks are numbered 1..=N, rendered into the cited prompt
    /// with the recent `history`, sent to the model, and the answer is
    /// audited against exactly those N chunks.
    ///
    /// # Errors
    /// Prompt rendering and generation failures propagate.
    pub async fn ask(
        &self,
        query: &str,
        history: &[ConversationTurn],
        options: &AskOptions,
    ) -> AppResult<RagResponse> {
        let Some(snapshot) = self.kb.snapshot() else {
            tracing::info!("Question received before any document was ingested");
            return Ok(RagResponse::not_ready());
        };

        self.kb.record_query();
        let config = self.kb.config();
        let top_k = options.top_k.unwrap_or(config.retrieval.top_k);

        let retrieved = self
            .kb
            .retrieve_in(&snapshot, query, top_k, self.embedder)
            .await;

        if retrieved.is_empty() {
            tracing::info!("No chunks retrieved for query");
            return Ok(RagResponse::no_information(query));
        }

        tracing::info!(
            "Retrieved {} chunks from '{}'",
            retrieved.len(),
            snapshot.document().name
        );

        let texts: Vec<&str> = retrieved.iter().map(|c| c.text.as_str()).collect();
        let passages = SourcePassage::numbered(texts.iter().copied());

        let built = build_cited_prompt(
            self.prompt,
            query,
            &passages,
            history,
            config.conversation.history_turns,
        )?;

        let mut request = LlmRequest::new(built.user, self.generation.model.clone())
            .with_temperature(self.generation.temperature)
            .with_top_p(self.generation.top_p)
            .with_max_tokens(self.generation.max_tokens);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        let answer = self.llm.complete(&request).await?.content;

        let citations = CitationPattern::with_label(&self.prompt.context.source_label);
        let validation = citations.validate(&answer, retrieved.len());
        if validation.is_valid {
            tracing::info!("Citation check passed: {}", validation.message);
        } else {
            tracing::warn!("Citation check failed: {}", validation.message);
        }

        let grounding = options
            .verify_grounding
            .then(|| verify_grounding_with(&answer, &texts, &config.grounding, &citations));
        if let Some(report) = &grounding {
            tracing::info!(
                ratio = report.ratio,
                well_grounded = report.is_well_grounded,
                "Grounding verified"
            );
        }

        let source_listing = format_sources(&texts, &validation.citation_ids, &config.display);

        Ok(RagResponse {
            status: AnswerStatus::Answered,
            answer,
            sources: retrieved,
            source_listing,
            citation_ids: validation.citation_ids.clone(),
            validation: Some(validation),
            grounding,
        })
    }
}
