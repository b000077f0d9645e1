//! Audit command handler.
//!
//! Checks an answer produced elsewhere against the source files it was
//! given, in order: the first `--source` is `[1]`. Markers are read with
//! the source label of the workspace's cited prompt.

use super::print_json;
use clap::Args;
use grounded_core::{config::AppConfig, AppError, AppResult};
use grounded_knowledge::{
    audit::verify_grounding_with, config::load_config, format_sources, parser, CitationPattern,
};
use grounded_prompt::{load_prompt, DEFAULT_PROMPT_ID};
use std::path::PathBuf;

/// Check an existing answer against source files
#[derive(Args, Debug)]
pub struct AuditCommand {
    /// Answer text, or @FILE to read it from a file
    #[arg(long)]
    pub answer: String,

    /// Source passage files, numbered 1..N in the order given
    #[arg(long = "source", required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AuditCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing audit command with {} sources", self.sources.len());

        let knowledge = load_config(&config.workspace)?;
        let prompt = load_prompt(&config.workspace, DEFAULT_PROMPT_ID)?;
        let citations = CitationPattern::with_label(&prompt.context.source_label);
        let answer = self.answer_text()?;

        let mut sources = Vec::with_capacity(self.sources.len());
        for path in &self.sources {
            sources.push(parser::clean_text(&parser::read_document(path)?));
        }

        let validation = citations.validate(&answer, sources.len());
        let grounding = verify_grounding_with(&answer, &sources, &knowledge.grounding, &citations);
        let listing = format_sources(&sources, &validation.citation_ids, &knowledge.display);

        if self.json {
            return print_json(&serde_json::json!({
                "validation": validation,
                "grounding": grounding,
                "sourceListing": listing,
            }));
        }

        let mark = if validation.is_valid { "✓" } else { "✗" };
        println!("Citations {} {}", mark, validation.message);
        println!(
            "Grounding: {}/{} sentences grounded ({:.0}%), {} skipped as too short",
            grounding.grounded_sentence_count,
            grounding.total_sentence_count,
            grounding.ratio * 100.0,
            grounding.skipped_sentence_count
        );
        println!(
            "Well grounded: {}",
            if grounding.is_well_grounded { "yes" } else { "no" }
        );
        println!();
        println!("{}", listing.render_markdown());

        Ok(())
    }

    fn answer_text(&self) -> AppResult<String> {
        match self.answer.strip_prefix('@') {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read answer file '{}': {}", path, e))
            }),
            None => Ok(self.answer.clone()),
        }
    }
}
