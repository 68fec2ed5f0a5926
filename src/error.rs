use std::path::PathBuf;

use thiserror::Error;

use crate::models::FileGroup;

/// Boxed cause carried by the wrapping variants
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Application error type
///
/// Every layer returns this type unchanged; the interactive shell is the only
/// place that turns it into a message and an exit code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing directory or file
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The directory holds no .pdf/.docx files
    #[error("no .pdf or .docx files found in directory: {}", path.display())]
    NoSupportedFiles { path: PathBuf },

    /// A required document role is absent from the file names
    #[error("no {role} document found (expected a file name matching the {role} pattern)")]
    MissingRequiredRole { role: FileGroup },

    /// Unparsable, out-of-range or empty mode selection
    #[error("invalid mode: {input:?} (expected one or more of 1, 2, 3, 4 separated by commas)")]
    InvalidMode { input: String },

    /// Format conversion or OCR failure
    #[error("{stage} failed for {}: {source}", path.display())]
    Conversion {
        stage: ConversionStage,
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Remote inference failure
    #[error("inference call failed (model: {model}): {source}")]
    Inference {
        model: String,
        #[source]
        source: BoxError,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Other filesystem errors
    #[error("I/O error ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline stage that produced a conversion error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    /// DOCX -> PDF
    DocxToPdf,
    /// PDF -> page images
    Rasterize,
    /// Page images -> text
    Ocr,
}

impl std::fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConversionStage::DocxToPdf => "DOCX to PDF conversion",
            ConversionStage::Rasterize => "PDF to image conversion",
            ConversionStage::Ocr => "text recognition",
        };
        f.write_str(name)
    }
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("environment variable {var_name} is not set")]
    EnvVarNotFound { var_name: String },

    /// Service-account key file could not be loaded
    #[error("cannot load service-account key file {}: {source}", path.display())]
    CredentialsUnreadable {
        path: PathBuf,
        #[source]
        source: gcp_auth::Error,
    },

    /// Prompts file could not be read
    #[error("cannot read prompts file {}: {source}", path.display())]
    PromptsFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Prompts file is not valid TOML for the prompt table
    #[error("cannot parse prompts file {}: {source}", path.display())]
    PromptsParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Prompt key is not a supported mode id
    #[error("prompt key {key:?} is not a supported mode (1-4)")]
    UnknownPromptKey { key: String },

    /// No template defined for a mode
    #[error("no prompt template defined for mode {mode}")]
    MissingPrompt { mode: u8 },
}

// ========== Convenience constructors ==========

impl AppError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        AppError::NotFound { path: path.into() }
    }

    pub fn invalid_mode(input: impl Into<String>) -> Self {
        AppError::InvalidMode {
            input: input.into(),
        }
    }

    pub fn conversion(
        stage: ConversionStage,
        path: impl Into<PathBuf>,
        source: impl Into<BoxError>,
    ) -> Self {
        AppError::Conversion {
            stage,
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn inference(model: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::Inference {
            model: model.into(),
            source: source.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

// ========== Result alias ==========

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
