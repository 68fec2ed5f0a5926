pub mod analysis_dispatcher;
pub mod conversion_pipeline;
pub mod document_collector;

pub use analysis_dispatcher::AnalysisDispatcher;
pub use conversion_pipeline::{ConversionPipeline, SourceFormat, TextExtractor};
pub use document_collector::DocumentCollector;
