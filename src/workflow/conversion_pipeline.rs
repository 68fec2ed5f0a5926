//! Conversion pipeline - workflow layer
//!
//! Turns one source file into plain text:
//! 1. DOCX -> PDF (DOCX only)
//! 2. PDF -> page images
//! 3. page images -> text
//!
//! Every invocation owns a fresh temporary directory that is removed on both
//! the success and the failure path.

use std::path::Path;

use async_trait::async_trait;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, ConversionStage};
use crate::infrastructure::check_binary;
use crate::services::{DocumentConverter, OcrEngine};

/// Source file -> plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> AppResult<String>;
}

/// Supported source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Docx,
}

impl SourceFormat {
    /// Format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "docx" => Some(SourceFormat::Docx),
            _ => None,
        }
    }
}

/// External tools the default pipeline shells out to
pub const REQUIRED_TOOLS: [&str; 3] = ["soffice", "pdftoppm", "tesseract"];

/// Conversion + OCR pipeline
pub struct ConversionPipeline {
    converter: Box<dyn DocumentConverter>,
    ocr: Box<dyn OcrEngine>,
    languages: String,
}

impl ConversionPipeline {
    pub fn new(
        converter: Box<dyn DocumentConverter>,
        ocr: Box<dyn OcrEngine>,
        languages: impl Into<String>,
    ) -> Self {
        Self {
            converter,
            ocr,
            languages: languages.into(),
        }
    }

    /// Availability of every external tool
    pub fn check_tools() -> Vec<(&'static str, bool)> {
        REQUIRED_TOOLS
            .iter()
            .map(|tool| (*tool, check_binary(tool)))
            .collect()
    }

    async fn extract_in(&self, path: &Path, format: SourceFormat, work_dir: &Path) -> AppResult<String> {
        let converted_dir = work_dir.join("converted");
        let images_dir = work_dir.join("images");
        for dir in [&converted_dir, &images_dir] {
            tokio::fs::create_dir(dir)
                .await
                .map_err(|e| AppError::io(dir, e))?;
        }

        let pdf_path = match format {
            SourceFormat::Docx => {
                info!("Type: DOCX. Converting to PDF first...");
                let pdf = self
                    .converter
                    .convert_to_intermediate(path, &converted_dir)
                    .await?;
                info!("DOCX converted to PDF: {}", pdf.display());
                pdf
            }
            SourceFormat::Pdf => {
                info!("Type: PDF. Converting to images...");
                path.to_path_buf()
            }
        };

        let images = self
            .converter
            .rasterize_to_images(&pdf_path, &images_dir)
            .await?;
        info!("PDF converted to images. Count: {}", images.len());

        let text = self.ocr.extract_text(&images, &self.languages).await?;
        info!("OCR finished. Text length: {}", text.chars().count());

        Ok(text)
    }
}

#[async_trait]
impl TextExtractor for ConversionPipeline {
    async fn extract(&self, path: &Path) -> AppResult<String> {
        let format = SourceFormat::from_path(path).ok_or_else(|| {
            AppError::conversion(ConversionStage::Rasterize, path, "unsupported file extension")
        })?;

        let work_dir = tempfile::Builder::new()
            .prefix("document_analyzer-")
            .tempdir()
            .map_err(|e| AppError::io(std::env::temp_dir(), e))?;
        debug!("Created temporary directory: {}", work_dir.path().display());

        let result = self.extract_in(path, format, work_dir.path()).await;
        release_work_dir(work_dir);
        result
    }
}

/// Remove a work directory; a failure is logged and never escalated
fn release_work_dir(dir: TempDir) {
    let path = dir.path().to_path_buf();
    match dir.close() {
        Ok(()) => debug!("Deleted temporary directory: {}", path.display()),
        Err(e) => warn!("Failed to delete temporary directory {}: {}", path.display(), e),
    }
}
