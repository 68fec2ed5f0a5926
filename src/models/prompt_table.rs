//! Mode -> prompt template lookup table

use std::collections::BTreeMap;

use crate::error::{AppResult, ConfigError};
use crate::models::Mode;

/// Fixed analysis instruction templates, keyed by mode
#[derive(Debug, Clone)]
pub struct PromptTable {
    templates: BTreeMap<Mode, String>,
}

impl PromptTable {
    /// Build a table from `(mode, template)` pairs.
    ///
    /// Every mode in [`Mode::ALL`] must have a template.
    pub fn new(templates: impl IntoIterator<Item = (Mode, String)>) -> AppResult<Self> {
        let templates: BTreeMap<Mode, String> = templates.into_iter().collect();
        if let Some(missing) = Mode::ALL.iter().find(|m| !templates.contains_key(*m)) {
            return Err(ConfigError::MissingPrompt { mode: missing.id() }.into());
        }
        Ok(Self { templates })
    }

    /// Template for `mode`
    pub fn template(&self, mode: Mode) -> AppResult<&str> {
        self.templates
            .get(&mode)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingPrompt { mode: mode.id() }.into())
    }

    pub(crate) fn len(&self) -> usize {
        self.templates.len()
    }
}
