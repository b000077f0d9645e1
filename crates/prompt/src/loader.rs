//! Prompt loader for YAML prompt definitions.
//!
//! Workspace prompts live in `.grounded/prompts/<id>.yml`. The default
//! cited-answer prompt ships inside the binary and is used unless the
//! workspace overrides it.

use crate::types::PromptDefinition;
use grounded_core::{AppError, AppResult};
use std::path::Path;

/// Identifier of the built-in cited-answer prompt.
pub const DEFAULT_PROMPT_ID: &str = "rag.cited.default";

const DEFAULT_PROMPT_YAML: &str = include_str!("../prompts/rag.cited.default.yml");

/// Load a prompt definition by ID.
///
/// # Example
/// ```no_run
/// use grounded_prompt::{load_prompt, DEFAULT_PROMPT_ID};
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), DEFAULT_PROMPT_ID)?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = workspace_path
        .join(".grounded/prompts")
        .join(format!("{}.yml", prompt_id));

    let definition = if prompt_file.exists() {
        tracing::debug!("Loading prompt from: {:?}", prompt_file);

        let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                prompt_file, e
            ))
        })?;

        serde_yaml::from_str::<PromptDefinition>(&contents).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to parse prompt YAML {:?}: {}",
                prompt_file, e
            ))
        })?
    } else if prompt_id == DEFAULT_PROMPT_ID {
        builtin_default()?
    } else {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    };

    validate_prompt(&definition)?;

    tracing::debug!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// The built-in cited-answer prompt.
pub fn builtin_default() -> AppResult<PromptDefinition> {
    serde_yaml::from_str(DEFAULT_PROMPT_YAML)
        .map_err(|e| AppError::Prompt(format!("Built-in prompt is invalid: {}", e)))
}

/// List all available prompt IDs, the built-in default included.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let prompts_dir = workspace_path.join(".grounded/prompts");
    let mut prompt_ids = vec![DEFAULT_PROMPT_ID.to_string()];

    if !prompts_dir.exists() {
        return Ok(prompt_ids);
    }

    for entry in walkdir::WalkDir::new(&prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !prompt_ids.iter().any(|id| id == stem) {
                    prompt_ids.push(stem.to_string());
                }
            }
        }
    }

    prompt_ids.sort();
    Ok(prompt_ids)
}

fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' has an empty template",
            def.id
        )));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    // Without these variables the prompt cannot carry the evidence at all
    for required in ["{{query}}", "sources"] {
        if !def.template.contains(required) {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' template must reference {}",
                def.id, required
            )));
        }
    }

    Ok(())
}
