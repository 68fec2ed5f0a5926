pub mod classifier;
pub mod converter;
pub mod llm_service;
pub mod ocr;
pub mod report_writer;

pub use classifier::{categorize, check_type, find_type};
pub use converter::{DocumentConverter, PopplerConverter};
pub use llm_service::{InferenceService, LlmService};
pub use ocr::{OcrEngine, TesseractOcr};
pub use report_writer::ReportWriter;
