use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tokio::fs;

use crate::error::{AppResult, ConfigError};
use crate::models::{Mode, PromptTable};

/// Prompt table compiled into the binary
const BUNDLED_PROMPTS: &str = include_str!("../../../prompts.toml");

/// Looked up in the working directory when no prompts file is configured
const LOCAL_PROMPTS_FILE: &str = "prompts.toml";

/// On-disk layout of the prompts file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PromptsFile {
    prompts: BTreeMap<String, String>,
}

/// Load the mode -> template table from a TOML file
///
/// ```toml
/// [prompts]
/// 1 = "..."
/// 2 = "..."
/// ```
pub async fn load_prompt_table(path: &Path) -> AppResult<PromptTable> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::PromptsFileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let table = parse_prompt_table(&content, path)?;
    tracing::debug!("Loaded {} prompt templates from {}", table.len(), path.display());
    Ok(table)
}

/// Prompt table for a run
///
/// An explicit path must be readable. Without one, `prompts.toml` in the
/// working directory is used when present, else the bundled table.
pub async fn resolve_prompt_table(path: Option<&Path>) -> AppResult<PromptTable> {
    if let Some(path) = path {
        return load_prompt_table(path).await;
    }

    let local = Path::new(LOCAL_PROMPTS_FILE);
    if fs::try_exists(local).await.unwrap_or(false) {
        return load_prompt_table(local).await;
    }

    tracing::debug!("No prompts file configured, using bundled templates");
    parse_prompt_table(BUNDLED_PROMPTS, Path::new("<bundled prompts.toml>"))
}

/// Parse prompts file content; `origin` is only used in error messages
pub fn parse_prompt_table(content: &str, origin: &Path) -> AppResult<PromptTable> {
    let file: PromptsFile =
        toml::from_str(content).map_err(|source| ConfigError::PromptsParseFailed {
            path: origin.to_path_buf(),
            source,
        })?;

    let mut templates = Vec::with_capacity(file.prompts.len());
    for (key, template) in file.prompts {
        let mode = key
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(|id| Mode::try_from(id).ok())
            .ok_or_else(|| ConfigError::UnknownPromptKey { key: key.clone() })?;
        templates.push((mode, template));
    }

    PromptTable::new(templates)
}
