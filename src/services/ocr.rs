//! Text recognition - business capability layer

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, ConversionStage};
use crate::infrastructure::CommandRunner;

/// OCR collaborator
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize `images` in order and return the concatenated text
    async fn extract_text(&self, images: &[PathBuf], language_hint: &str) -> AppResult<String>;
}

/// OCR backed by the `tesseract` binary
pub struct TesseractOcr {
    runner: CommandRunner,
}

impl TesseractOcr {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    async fn recognize_page(&self, image: &Path, language_hint: &str) -> AppResult<String> {
        let stdout = self
            .runner
            .run(
                "tesseract",
                [
                    image.as_os_str(),
                    OsStr::new("stdout"),
                    OsStr::new("-l"),
                    OsStr::new(language_hint),
                ],
                "install tesseract-ocr and the language packs",
            )
            .await
            .map_err(|e| AppError::conversion(ConversionStage::Ocr, image, e))?;

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn extract_text(&self, images: &[PathBuf], language_hint: &str) -> AppResult<String> {
        info!("Starting OCR. Pages: {}, languages: {}", images.len(), language_hint);
        let mut all_text = String::new();

        for (index, image) in images.iter().enumerate() {
            let page = index + 1;
            if !image.is_file() {
                warn!("Page image {} is missing, skipped: {}", page, image.display());
                continue;
            }

            let text = self.recognize_page(image, language_hint).await?;
            debug!("OCR page {} done, text length: {}", page, text.chars().count());
            all_text.push_str(&text);
        }

        let all_text = all_text.trim().to_string();
        info!("OCR finished. Total text length: {}", all_text.chars().count());
        Ok(all_text)
    }
}
