//! Ingest command handler.

use super::{print_json, Session};
use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Ingest a document and show index statistics
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Text or markdown document
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command for {:?}", self.file);

        let (_, stats) = Session::with_document(config, &self.file).await?;

        if self.json {
            print_json(&serde_json::to_value(&stats)?)?;
        } else {
            println!(
                "Ingested '{}': {} chunks, {} characters in {:.2}s",
                stats.document_name, stats.total_chunks, stats.total_characters, stats.duration_secs
            );
            println!("  Embedding dimensions: {}", stats.embedding_dimensions);
            println!("  Fingerprint: {}", stats.fingerprint);
        }

        Ok(())
    }
}
