//! Report writer - business capability layer
//!
//! Only appends analysis results to a report file; does not decide when.

use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::Mode;

/// Appends each mode's result to a text file
pub struct ReportWriter {
    report_path: PathBuf,
}

impl ReportWriter {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.report_path
    }

    /// Append one result block
    ///
    /// # Arguments
    /// - `directory`: analysed directory
    /// - `mode`: mode the result belongs to
    /// - `result`: text returned by the inference service
    pub async fn write(&self, directory: &Path, mode: Mode, result: &str) -> AppResult<()> {
        debug!(
            "Writing report: mode {} | result length: {}",
            mode,
            result.chars().count()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_path)
            .await
            .map_err(|e| AppError::io(&self.report_path, e))?;

        let block = format!(
            "{}\n{} | {} | mode {}\n{}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            directory.display(),
            mode,
            "=".repeat(60),
            result
        );

        file.write_all(block.as_bytes())
            .await
            .map_err(|e| AppError::io(&self.report_path, e))?;
        file.flush()
            .await
            .map_err(|e| AppError::io(&self.report_path, e))?;

        Ok(())
    }
}
