//! Ask command handler.
//!
//! Ingests the document, answers one question and prints the audit.

use super::{generation_settings, print_json, Session};
use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use grounded_knowledge::{AskOptions, RagPipeline, RagResponse};
use grounded_llm::create_client;
use grounded_prompt::{load_prompt, DEFAULT_PROMPT_ID};
use std::path::PathBuf;

/// Answer one question with citations
#[derive(Args, Debug)]
pub struct AskCommand {
    /// Document to answer from
    pub file: PathBuf,

    /// The question to ask
    pub question: String,

    /// Number of chunks to retrieve (default: retrieval.top_k)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Skip the grounding report
    #[arg(long)]
    pub no_grounding: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let (session, _) = Session::with_document(config, &self.file).await?;
        let client = create_client(&config.provider, config.endpoint.as_deref())?;
        let prompt = load_prompt(&config.workspace, DEFAULT_PROMPT_ID)?;

        let options = AskOptions {
            top_k: self.top_k,
            verify_grounding: !self.no_grounding,
        };

        let response = RagPipeline::new(&session.kb, client.as_ref(), &prompt)
            .with_embedder(session.embedder())
            .with_generation(generation_settings(config))
            .ask(&self.question, &[], &options)
            .await?;

        if self.json {
            print_json(&serde_json::to_value(&response)?)?;
        } else {
            print_response(&response);
        }

        Ok(())
    }
}

/// Human-readable answer, sources and audit summary.
pub(crate) fn print_response(response: &RagResponse) {
    println!("{}", response.answer);

    if !response.is_answered() {
        return;
    }

    println!();
    println!("{}", response.source_listing.render_markdown());

    if let Some(validation) = &response.validation {
        println!();
        let mark = if validation.is_valid { "✓" } else { "✗" };
        println!("Citations {} {}", mark, validation.message);
    }

    if let Some(grounding) = &response.grounding {
        println!(
            "Grounding: {}/{} sentences grounded ({:.0}%){}",
            grounding.grounded_sentence_count,
            grounding.total_sentence_count,
            grounding.ratio * 100.0,
            if grounding.is_well_grounded {
                ""
            } else {
                ", weakly grounded"
            }
        );
    }
}
