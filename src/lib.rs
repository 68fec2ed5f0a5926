//! # Document Analyzer
//!
//! Console tool that OCRs a directory of PDF/DOCX files, labels each file by
//! its name, and runs one of four fixed analysis prompts over the whole set
//! through an LLM.
//!
//! ## Layers
//!
//! ### ① Infrastructure
//! - `infrastructure/` - runs external tools, nothing else
//!
//! ### ② Services
//! - `services/` - single capabilities: classify a name, convert a file,
//!   recognize text, call the model, append to the report
//!
//! ### ③ Workflow
//! - `workflow/` - the per-file conversion pipeline, the directory collector
//!   and the per-mode dispatcher
//!
//! ### ④ Orchestration
//! - `orchestrator/` - the interactive shell

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use config::{Config, InferenceConfig};
pub use error::{AppError, AppResult, ConfigError, ConversionStage};
pub use models::{parse_modes, Document, FileGroup, Mode, PromptTable};
pub use orchestrator::{Answers, App, Console};
pub use workflow::{AnalysisDispatcher, ConversionPipeline, DocumentCollector, TextExtractor};
