//! Logging helpers
//!
//! Logs go to stderr; stdout carries only the console dialogue and results.

use std::collections::BTreeSet;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{Document, Mode};

/// Install the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` when `verbose`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Record startup settings
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("Document analyzer starting");
    info!("Model: {}", config.inference.model_name);
    info!("OCR languages: {}", config.ocr_languages);
    match &config.prompts_file {
        Some(path) => info!("Prompts file: {}", path.display()),
        None => info!("Prompts file: default"),
    }
    if let Some(report) = &config.report_file {
        info!("Report file: {}", report.display());
    }
    info!("{}", "=".repeat(60));
}

pub fn log_documents_found(documents: &[Document]) {
    info!("Collected {} documents", documents.len());
    for document in documents {
        info!(
            "  {} ({} characters)",
            document.name,
            document.text.chars().count()
        );
    }
}

pub fn log_run_complete(modes: &BTreeSet<Mode>) {
    let modes: Vec<String> = modes.iter().map(Mode::to_string).collect();
    info!("{}", "─".repeat(60));
    info!(
        "Run finished at {}, modes: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        modes.join(", ")
    );
    info!("{}", "─".repeat(60));
}

/// Truncate long text for log display
///
/// # Arguments
/// - `text`: original text
/// - `max_len`: maximum number of characters kept
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("обґрунтування", 4), "обґр...");
    }
}
