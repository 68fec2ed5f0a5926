//! Orchestration layer
//!
//! ```text
//! app::App (one interactive run)
//!     ↓
//! workflow::DocumentCollector → workflow::ConversionPipeline
//!     ↓
//! workflow::AnalysisDispatcher (once per mode)
//!     ↓
//! services (classifier / converter / ocr / llm / report)
//!     ↓
//! infrastructure (CommandRunner)
//! ```

pub mod app;
pub mod console;

pub use app::{Answers, App};
pub use console::Console;
