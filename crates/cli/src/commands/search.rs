//! Search command handler.
//!
//! Runs hybrid retrieval only; nothing is generated.

use super::{print_json, Session};
use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Hybrid retrieval without generation
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Document to search
    pub file: PathBuf,

    /// Query text
    pub query: String,

    /// Number of chunks to retrieve (default: retrieval.top_k)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let (session, _) = Session::with_document(config, &self.file).await?;
        let top_k = session.top_k(self.top_k);

        let results = session
            .kb
            .retrieve(&self.query, top_k, session.embedder())
            .await;

        tracing::debug!("Search returned {} chunks", results.len());

        if self.json {
            print_json(&serde_json::json!({
                "query": self.query,
                "topK": top_k,
                "results": results,
            }))?;
            return Ok(());
        }

        if results.is_empty() {
            println!("No matching chunks.");
            return Ok(());
        }

        for (position, result) in results.iter().enumerate() {
            println!(
                "[{}] chunk {} (score {:.4})",
                position + 1,
                result.chunk_index,
                result.score
            );
            println!("{}", result.text);
            println!();
        }

        Ok(())
    }
}
