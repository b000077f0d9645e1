//! Chat command handler.
//!
//! Reads questions from stdin and keeps a conversation window for
//! follow-ups. Lines starting with `/` are session commands.

use super::ask::print_response;
use super::{generation_settings, Session};
use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use grounded_knowledge::{AskOptions, Conversation, RagPipeline};
use grounded_llm::create_client;
use grounded_prompt::{load_prompt, DEFAULT_PROMPT_ID};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive questions with conversation memory
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Document to answer from
    pub file: PathBuf,

    /// Number of chunks to retrieve per question (default: retrieval.top_k)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Skip the grounding report
    #[arg(long)]
    pub no_grounding: bool,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let (session, stats) = Session::with_document(config, &self.file).await?;
        let client = create_client(&config.provider, config.endpoint.as_deref())?;
        let prompt = load_prompt(&config.workspace, DEFAULT_PROMPT_ID)?;

        let pipeline = RagPipeline::new(&session.kb, client.as_ref(), &prompt)
            .with_embedder(session.embedder())
            .with_generation(generation_settings(config));
        let options = AskOptions {
            top_k: self.top_k,
            verify_grounding: !self.no_grounding,
        };

        println!(
            "Loaded '{}' ({} chunks). Commands: /stats, /clear, /quit",
            stats.document_name, stats.total_chunks
        );

        let mut conversation = Conversation::new();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();

            match line {
                "" => continue,
                "/quit" | "/exit" => break,
                "/clear" => {
                    conversation.clear();
                    println!("Conversation cleared.");
                    continue;
                }
                "/stats" => {
                    let stats = session.kb.stats();
                    println!(
                        "Document: {}",
                        stats.document_name.as_deref().unwrap_or("(none)")
                    );
                    println!("  Chunks: {}", stats.total_chunks);
                    println!("  Questions: {}", stats.total_queries);
                    println!("  Conversation turns: {}", conversation.len());
                    continue;
                }
                command if command.starts_with('/') => {
                    println!("Unknown command '{}'. Commands: /stats, /clear, /quit", command);
                    continue;
                }
                _ => {}
            }

            // A failed generation ends this question, not the session
            match pipeline.ask(line, conversation.turns(), &options).await {
                Ok(response) => {
                    print_response(&response);
                    if response.is_answered() {
                        conversation.push(line, response.answer.as_str());
                    }
                }
                Err(e) => {
                    tracing::error!("Question failed: {}", e);
                    println!("Error: {}", e);
                }
            }
            println!();
        }

        Ok(())
    }
}
