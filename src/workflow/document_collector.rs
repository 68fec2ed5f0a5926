//! Document collector - workflow layer
//!
//! Scans one directory, checks that the required roles are present by file
//! name, then converts and labels every supported file.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{Document, FileGroup};
use crate::services::{categorize, find_type};
use crate::workflow::conversion_pipeline::{SourceFormat, TextExtractor};

pub struct DocumentCollector {
    extractor: Box<dyn TextExtractor>,
}

impl DocumentCollector {
    pub fn new(extractor: Box<dyn TextExtractor>) -> Self {
        Self { extractor }
    }

    /// List the supported files of `dir`, sorted by name, and check roles.
    ///
    /// Nothing is converted here, so a directory that cannot be analysed is
    /// rejected before any external tool runs.
    pub async fn scan(&self, dir: &Path) -> AppResult<Vec<PathBuf>> {
        match tokio::fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(AppError::not_found(dir)),
            Err(e) if is_missing(&e) => return Err(AppError::not_found(dir)),
            Err(e) => return Err(AppError::io(dir, e)),
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| AppError::io(dir, e))?;

        while let Some(entry) = entries.next_entry().await.map_err(|e| AppError::io(dir, e))? {
            let file_type = entry.file_type().await.map_err(|e| AppError::io(entry.path(), e))?;
            let path = entry.path();
            if file_type.is_file() && SourceFormat::from_path(&path).is_some() {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(AppError::NoSupportedFiles {
                path: dir.to_path_buf(),
            });
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let names: Vec<String> = files.iter().map(|path| file_name(path)).collect();
        for role in FileGroup::REQUIRED {
            if !find_type(&names, role) {
                return Err(AppError::MissingRequiredRole { role });
            }
        }

        Ok(files)
    }

    /// Convert and label every supported file of `dir`.
    ///
    /// The first failing file aborts the whole collection.
    pub async fn collect(&self, dir: &Path) -> AppResult<Vec<Document>> {
        let files = self.scan(dir).await?;
        let total = files.len();
        let mut documents = Vec::with_capacity(total);

        for (index, path) in files.iter().enumerate() {
            info!("[{}/{}] Processing file: {}", index + 1, total, path.display());

            let text = self.extractor.extract(path).await?;
            let name = file_name(path);
            let document = Document::labeled(categorize(&name), &name, text);
            info!("[{}/{}] Document type: {}", index + 1, total, document.name);

            documents.push(document);
        }

        Ok(documents)
    }
}

/// Nothing at the path, or a path component is a plain file
fn is_missing(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
