//! Document format conversion - business capability layer
//!
//! DOCX -> PDF through LibreOffice, PDF -> page images through Poppler.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, ConversionStage};
use crate::infrastructure::CommandRunner;

/// Format conversion collaborator
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert a DOCX file to PDF inside `out_dir`, returning the PDF path
    async fn convert_to_intermediate(&self, path: &Path, out_dir: &Path) -> AppResult<PathBuf>;

    /// Render every page of `pdf` into `out_dir`, returning images in page order
    async fn rasterize_to_images(&self, pdf: &Path, out_dir: &Path) -> AppResult<Vec<PathBuf>>;
}

/// Prefix of rendered page images
const PAGE_PREFIX: &str = "page";

/// Converter backed by `soffice` and `pdftoppm`
pub struct PopplerConverter {
    runner: CommandRunner,
    render_width_px: u32,
}

impl PopplerConverter {
    pub fn new(runner: CommandRunner, render_width_px: u32) -> Self {
        Self {
            runner,
            render_width_px,
        }
    }
}

#[async_trait]
impl DocumentConverter for PopplerConverter {
    async fn convert_to_intermediate(&self, path: &Path, out_dir: &Path) -> AppResult<PathBuf> {
        let stage = ConversionStage::DocxToPdf;
        if !path.is_file() {
            return Err(AppError::not_found(path));
        }

        self.runner
            .run(
                "soffice",
                [
                    OsStr::new("--headless"),
                    OsStr::new("--convert-to"),
                    OsStr::new("pdf"),
                    OsStr::new("--outdir"),
                    out_dir.as_os_str(),
                    path.as_os_str(),
                ],
                "install LibreOffice",
            )
            .await
            .map_err(|e| AppError::conversion(stage, path, e))?;

        let stem = path
            .file_stem()
            .ok_or_else(|| AppError::conversion(stage, path, "file has no name"))?;
        let mut pdf_name = stem.to_os_string();
        pdf_name.push(".pdf");
        let pdf_path = out_dir.join(pdf_name);

        if !pdf_path.is_file() {
            return Err(AppError::conversion(
                stage,
                path,
                format!("soffice did not produce {}", pdf_path.display()),
            ));
        }

        debug!("DOCX converted to PDF: {}", pdf_path.display());
        Ok(pdf_path)
    }

    async fn rasterize_to_images(&self, pdf: &Path, out_dir: &Path) -> AppResult<Vec<PathBuf>> {
        let stage = ConversionStage::Rasterize;
        if !pdf.is_file() {
            return Err(AppError::not_found(pdf));
        }

        // Work on a private copy; the source file is never opened by the renderer.
        let input = out_dir.join("input.pdf");
        tokio::fs::copy(pdf, &input)
            .await
            .map_err(|e| AppError::conversion(stage, pdf, e))?;

        let width = self.render_width_px.to_string();
        let prefix = out_dir.join(PAGE_PREFIX);
        info!("Rendering PDF pages (width {}px): {}", width, pdf.display());

        self.runner
            .run(
                "pdftoppm",
                [
                    OsStr::new("-png"),
                    OsStr::new("-scale-to"),
                    OsStr::new(&width),
                    input.as_os_str(),
                    prefix.as_os_str(),
                ],
                "install poppler-utils",
            )
            .await
            .map_err(|e| AppError::conversion(stage, pdf, e))?;

        let images = collect_page_images(out_dir)
            .await
            .map_err(|e| AppError::conversion(stage, pdf, e))?;

        if images.is_empty() {
            return Err(AppError::conversion(stage, pdf, "no images generated from PDF"));
        }

        Ok(images)
    }
}

/// Rendered page images in `dir`, sorted by page
///
/// pdftoppm zero-pads page numbers to the width of the page count, so a name
/// sort is a page sort.
pub(crate) async fn collect_page_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(PAGE_PREFIX) && name.ends_with(".png") {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::check_binary;

    #[tokio::test]
    async fn test_collect_page_images_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-03.png", "page-01.png", "page-02.png", "input.pdf", "other.png"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let images = collect_page_images(dir.path()).await.unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["page-01.png", "page-02.png", "page-03.png"]);
    }

    #[tokio::test]
    async fn test_rasterize_missing_file() {
        let converter = PopplerConverter::new(CommandRunner::default(), 3000);
        let dir = tempfile::tempdir().unwrap();
        let result = converter
            .rasterize_to_images(Path::new("/nonexistent/file.pdf"), dir.path())
            .await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_docx_missing_file() {
        let converter = PopplerConverter::new(CommandRunner::default(), 3000);
        let dir = tempfile::tempdir().unwrap();
        let result = converter
            .convert_to_intermediate(Path::new("/nonexistent/file.docx"), dir.path())
            .await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_rasterize_invalid_pdf_is_conversion_error() {
        if !check_binary("pdftoppm") {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.pdf");
        std::fs::write(&bogus, b"not a pdf").unwrap();
        let out = tempfile::tempdir().unwrap();

        let converter = PopplerConverter::new(CommandRunner::default(), 3000);
        let result = converter.rasterize_to_images(&bogus, out.path()).await;
        assert!(matches!(
            result,
            Err(AppError::Conversion {
                stage: ConversionStage::Rasterize,
                ..
            })
        ));
    }
}
