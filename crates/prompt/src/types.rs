//! Prompt types.

use serde::{Deserialize, Serialize};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Behavioral settings
    pub behavior: PromptBehavior,

    /// How sources are presented to the model
    #[serde(default)]
    pub context: PromptContextConfig,

    /// System message, sent verbatim
    #[serde(default)]
    pub system: Option<String>,

    /// Template string with Handlebars syntax
    pub template: String,

    /// Output specification
    pub output: PromptOutputSpec,
}

/// Behavioral settings for prompt execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptBehavior {
    /// Tone (e.g., "professional")
    pub tone: String,

    /// Style (e.g., "concise")
    pub style: String,
}

/// Source presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptContextConfig {
    /// Label printed before each source number, e.g. "Source" -> "[Source 1]"
    #[serde(rename = "sourceLabel", default = "default_source_label")]
    pub source_label: String,
}

fn default_source_label() -> String {
    "Source".to_string()
}

impl Default for PromptContextConfig {
    fn default() -> Self {
        Self {
            source_label: default_source_label(),
        }
    }
}

/// Output specification for the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOutputSpec {
    /// Output format (e.g., "text", "markdown")
    pub format: String,
}

/// One exchange of a prior conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user: String,
    pub assistant: String,
}

impl ConversationTurn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// A retrieved passage as shown to the model.
///
/// `number` is the 1-based display position within the current retrieval
/// result, which is what citation markers refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePassage {
    pub number: usize,
    pub text: String,
}

impl SourcePassage {
    /// Number passages 1..=N in the order given.
    pub fn numbered<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Self {
                number: i + 1,
                text: text.into(),
            })
            .collect()
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Number of passages included
    #[serde(rename = "sourceCount")]
    pub source_count: usize,

    /// Number of prior turns included
    #[serde(rename = "historyTurnsIncluded")]
    pub history_turns_included: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: test.prompt
title: Test Prompt
apiVersion: "1.0"
createdBy: test
behavior:
  tone: professional
  style: concise
context:
  sourceLabel: Kaynak
template: "{{query}}"
output:
  format: text
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "test.prompt");
        assert_eq!(def.context.source_label, "Kaynak");
        assert!(def.system.is_none());
    }

    #[test]
    fn test_context_defaults_when_missing() {
        let yaml = r#"
id: bare
title: Bare
apiVersion: "1.0"
behavior:
  tone: neutral
  style: short
template: "{{query}}"
output:
  format: text
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.context.source_label, "Source");
    }

    #[test]
    fn test_numbered_passages_start_at_one() {
        let passages = SourcePassage::numbered(["first", "second"]);
        assert_eq!(passages[0].number, 1);
        assert_eq!(passages[1].number, 2);
        assert_eq!(passages[1].text, "second");
    }
}
