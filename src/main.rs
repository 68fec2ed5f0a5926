use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use document_analyzer::orchestrator::console;
use document_analyzer::utils::logging;
use document_analyzer::{Answers, App, Config};

/// OCR a directory of PDF/DOCX files and analyse them with an LLM
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Directory with .pdf/.docx files (asked for when omitted)
    #[arg(short, long)]
    dir: Option<String>,

    /// Comma-separated analysis modes, e.g. "1,3" (asked for when omitted)
    #[arg(short, long)]
    modes: Option<String>,

    /// Prompts file (bundled templates when omitted)
    #[arg(short, long, env = "PROMPTS_FILE")]
    prompts: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // .env is optional
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(prompts) = cli.prompts {
        config.prompts_file = Some(prompts);
    }
    config.verbose_logging |= cli.verbose;

    logging::init(config.verbose_logging);

    // Startup failures (config, prompts file) end the process with status 1
    let app = App::initialize(config)
        .await
        .context("failed to initialize document analyzer")?;

    let answers = Answers {
        directory: cli.dir,
        modes: cli.modes,
    };

    let mut console = console::stdio();
    match app.run(&mut console, answers).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
