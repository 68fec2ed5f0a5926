//! Interactive shell - orchestration layer
//!
//! ## Responsibilities
//!
//! 1. **Startup**: load prompts, build the conversion and inference collaborators
//! 2. **Prompts**: ask for the directory and the mode(s)
//! 3. **Dispatch**: collect once, analyse once per distinct mode
//! 4. **Output**: print every result under its own heading
//! 5. **Recovery**: the only place an error is turned into a message
//!
//! No conversion or classification logic lives here.

use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::CommandRunner;
use crate::models::{parse_modes, resolve_prompt_table, Mode};
use crate::orchestrator::console::Console;
use crate::services::{LlmService, PopplerConverter, ReportWriter, TesseractOcr};
use crate::utils::logging::{log_documents_found, log_run_complete, log_startup, truncate_text};
use crate::workflow::{AnalysisDispatcher, ConversionPipeline, DocumentCollector};

/// Answers supplied up front (command line); missing ones are asked for
#[derive(Debug, Clone, Default)]
pub struct Answers {
    pub directory: Option<String>,
    pub modes: Option<String>,
}

/// Application
pub struct App {
    collector: DocumentCollector,
    dispatcher: AnalysisDispatcher,
    report: Option<ReportWriter>,
}

impl App {
    /// Build the application with the real external collaborators
    pub async fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);

        let prompts = resolve_prompt_table(config.prompts_file.as_deref()).await?;
        let inference = LlmService::new(&config.inference)?;

        for (tool, available) in ConversionPipeline::check_tools() {
            if !available {
                warn!("External tool not found on PATH: {}", tool);
            }
        }

        let runner = CommandRunner::new(config.external_timeout_secs);
        let pipeline = ConversionPipeline::new(
            Box::new(PopplerConverter::new(runner.clone(), config.render_width_px)),
            Box::new(TesseractOcr::new(runner)),
            config.ocr_languages.clone(),
        );

        let app = Self::new(
            DocumentCollector::new(Box::new(pipeline)),
            AnalysisDispatcher::new(prompts, Box::new(inference)),
        );

        Ok(match &config.report_file {
            Some(path) => app.with_report(ReportWriter::with_path(path)),
            None => app,
        })
    }

    /// Assemble from already-built parts
    pub fn new(collector: DocumentCollector, dispatcher: AnalysisDispatcher) -> Self {
        Self {
            collector,
            dispatcher,
            report: None,
        }
    }

    pub fn with_report(mut self, report: ReportWriter) -> Self {
        self.report = Some(report);
        self
    }

    /// Run one interactive session.
    ///
    /// Any failure is printed to the console before it is returned, so the
    /// caller only has to pick the exit code.
    pub async fn run<R, W>(&self, console: &mut Console<R, W>, answers: Answers) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        match self.run_session(console, answers).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Run failed: {}", e);
                // Console may be the thing that failed; the error is already logged.
                let _ = console.print_line(&format!("Error: {}", e)).await;
                Err(e)
            }
        }
    }

    async fn run_session<R, W>(&self, console: &mut Console<R, W>, answers: Answers) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        console.print_line("=== Document Analyzer CLI ===").await?;

        let directory = match answers.directory {
            Some(dir) => dir.trim().to_string(),
            None => {
                console
                    .ask("Enter directory path with .pdf/.docx files: ")
                    .await?
            }
        };
        let raw_modes = match answers.modes {
            Some(modes) => modes,
            None => {
                console
                    .ask("Choose analysis mode(s) (1-4, comma-separated): ")
                    .await?
            }
        };
        let modes = parse_modes(&raw_modes)?;

        console
            .print_line("Scanning and processing documents in directory...")
            .await?;
        let directory = Path::new(&directory);
        let documents = self.collector.collect(directory).await?;
        log_documents_found(&documents);
        console
            .print_line(&format!("Documents found: {}", documents.len()))
            .await?;

        for mode in &modes {
            console
                .print_line(&format!("Running analysis mode {}...", mode))
                .await?;
            let result = self.dispatcher.analyze(&documents, *mode).await?;
            info!("Mode {} result: {}", mode, truncate_text(&result, 80));

            console
                .print_line(&format!("=== Analysis result (mode {}) ===", mode))
                .await?;
            console.print_line(&result).await?;

            self.save_report(directory, *mode, &result).await;
        }

        log_run_complete(&modes);
        Ok(())
    }

    async fn save_report(&self, directory: &Path, mode: Mode, result: &str) {
        if let Some(report) = &self.report {
            if let Err(e) = report.write(directory, mode, result).await {
                warn!("Failed to write report {}: {}", report.path().display(), e);
            }
        }
    }
}
