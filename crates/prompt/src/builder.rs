//! Prompt builder for rendering the cited-answer template.

use crate::types::{
    BuiltPrompt, BuiltPromptMetadata, ConversationTurn, PromptDefinition, SourcePassage,
};
use grounded_core::{AppError, AppResult};
use handlebars::Handlebars;
use serde::Serialize;

#[derive(Serialize)]
struct RenderSource<'a> {
    label: &'a str,
    number: usize,
    text: &'a str,
}

#[derive(Serialize)]
struct RenderContext<'a> {
    query: &'a str,
    sources: Vec<RenderSource<'a>>,
    history: &'a [ConversationTurn],
}

/// Build the generation prompt for one question.
///
/// Sources are rendered in the order given, each under its display number.
/// Only the most recent `history_window` turns of `history` are included.
///
/// # Example
/// ```no_run
/// use grounded_prompt::{build_cited_prompt, loader::builtin_default, SourcePassage};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = builtin_default()?;
/// let sources = SourcePassage::numbered(["Paracetamol is an antipyretic."]);
/// let built = build_cited_prompt(&def, "What is paracetamol?", &sources, &[], 3)?;
/// println!("{}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_cited_prompt(
    definition: &PromptDefinition,
    query: &str,
    sources: &[SourcePassage],
    history: &[ConversationTurn],
    history_window: usize,
) -> AppResult<BuiltPrompt> {
    let window_start = history.len().saturating_sub(history_window);
    let recent = &history[window_start..];

    tracing::debug!(
        "Building prompt '{}' with {} sources and {} history turns",
        definition.id,
        sources.len(),
        recent.len()
    );

    let label = definition.context.source_label.as_str();
    let context = RenderContext {
        query,
        sources: sources
            .iter()
            .map(|s| RenderSource {
                label,
                number: s.number,
                text: &s.text,
            })
            .collect(),
        history: recent,
    };

    let user = render_template(&definition.template, &context)?;

    Ok(BuiltPrompt {
        system: definition.system.clone(),
        user,
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            source_count: sources.len(),
            history_turns_included: recent.len(),
        },
    })
}

/// Render a Handlebars template against a serializable context.
fn render_template<T: Serialize>(template: &str, context: &T) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", context)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::builtin_default;
    use crate::types::{PromptBehavior, PromptContextConfig, PromptOutputSpec};

    fn compact_definition(label: &str) -> PromptDefinition {
        PromptDefinition {
            id: "test.prompt".to_string(),
            title: "Test".to_string(),
            api_version: "1.0".to_string(),
            created_by: "test".to_string(),
            behavior: PromptBehavior {
                tone: "professional".to_string(),
                style: "concise".to_string(),
            },
            context: PromptContextConfig {
                source_label: label.to_string(),
            },
            system: None,
            template: "{{#each history}}<{{this.user}}|{{this.assistant}}>{{/each}}\
                       {{#each sources}}[{{this.label}} {{this.number}}] {{this.text}};{{/each}}\
                       Q: {{query}}"
                .to_string(),
            output: PromptOutputSpec {
                format: "text".to_string(),
            },
        }
    }

    fn turns(n: usize) -> Vec<ConversationTurn> {
        (1..=n)
            .map(|i| ConversationTurn::new(format!("q{}", i), format!("a{}", i)))
            .collect()
    }

    #[test]
    fn test_sources_rendered_with_display_numbers() {
        let def = compact_definition("Kaynak");
        let sources = SourcePassage::numbered(["alpha", "beta"]);

        let built = build_cited_prompt(&def, "why?", &sources, &[], 3).unwrap();
        assert_eq!(built.user, "[Kaynak 1] alpha;[Kaynak 2] beta;Q: why?");
        assert_eq!(built.metadata.source_count, 2);
    }

    #[test]
    fn test_history_window_keeps_most_recent_turns() {
        let def = compact_definition("Source");
        let history = turns(5);

        let built = build_cited_prompt(&def, "next", &[], &history, 3).unwrap();
        assert!(built.user.starts_with("<q3|a3><q4|a4><q5|a5>"));
        assert!(!built.user.contains("q2"));
        assert_eq!(built.metadata.history_turns_included, 3);
    }

    #[test]
    fn test_short_history_is_included_whole() {
        let def = compact_definition("Source");
        let built = build_cited_prompt(&def, "next", &[], &turns(2), 3).unwrap();
        assert_eq!(built.metadata.history_turns_included, 2);
    }

    #[test]
    fn test_no_html_escaping() {
        let def = compact_definition("Source");
        let sources = SourcePassage::numbered(["dose < 4 g & \"max\""]);
        let built = build_cited_prompt(&def, "a > b", &sources, &[], 3).unwrap();
        assert!(built.user.contains("dose < 4 g & \"max\""));
        assert!(built.user.contains("a > b"));
    }

    #[test]
    fn test_builtin_prompt_renders_sources_and_empty_history() {
        let def = builtin_default().unwrap();
        let sources = SourcePassage::numbered(["Paracetamol is an antipyretic."]);

        let built = build_cited_prompt(&def, "What is paracetamol?", &sources, &[], 3).unwrap();
        assert!(built.user.contains("[Source 1]\nParacetamol is an antipyretic."));
        assert!(built.user.contains("Previous conversation:\nNone"));
        assert!(built.user.contains("Question: What is paracetamol?"));
        assert!(built.system.is_some());
    }

    #[test]
    fn test_builtin_prompt_renders_history() {
        let def = builtin_default().unwrap();
        let history = vec![ConversationTurn::new("Dose?", "500 mg [1].")];

        let built = build_cited_prompt(&def, "And for children?", &[], &history, 3).unwrap();
        assert!(built.user.contains("User: Dose?\nAssistant: 500 mg [1]."));
        assert!(!built.user.contains("None\n"));
    }

    #[test]
    fn test_invalid_template_is_prompt_error() {
        let mut def = compact_definition("Source");
        def.template = "{{#each sources}}unclosed".to_string();
        let result = build_cited_prompt(&def, "q", &[], &[], 3);
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
