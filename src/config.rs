use std::path::PathBuf;

use crate::error::ConfigError;

/// Program configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Inference service settings
    pub inference: InferenceConfig,
    /// Tesseract language hint
    pub ocr_languages: String,
    /// Target page width in pixels when rendering PDFs
    pub render_width_px: u32,
    /// Per-command timeout for external tools (none = wait forever)
    pub external_timeout_secs: Option<u64>,
    /// TOML file with the four analysis prompts (bundled table when unset)
    pub prompts_file: Option<PathBuf>,
    /// Append every result to this file
    pub report_file: Option<PathBuf>,
    /// Show debug logs
    pub verbose_logging: bool,
}

/// Settings handed to the inference client
#[derive(Clone, Debug)]
pub struct InferenceConfig {
    /// Static bearer token; ignored when `credentials_path` is set
    pub api_key: String,
    /// Service-account key file used to mint access tokens
    pub credentials_path: Option<PathBuf>,
    /// OpenAI-compatible endpoint; derived from project/location when absent
    pub api_base_url: Option<String>,
    pub project_id: Option<String>,
    pub location: Option<String>,
    pub model_name: String,
    pub temperature: f32,
    /// Output token cap (provider default when unset)
    pub max_tokens: Option<u32>,
}

/// Smallest page width worth sending to OCR
pub const MIN_RENDER_WIDTH_PX: u32 = 3000;

fn default_render_width() -> u32 {
    let scaled = (2500.0_f64 * 2.5).round() as u32;
    scaled.max(MIN_RENDER_WIDTH_PX)
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            credentials_path: None,
            api_base_url: None,
            project_id: None,
            location: None,
            model_name: "google/gemini-2.5-pro".to_string(),
            temperature: 0.2,
            max_tokens: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inference: InferenceConfig::default(),
            ocr_languages: "ukr+eng".to_string(),
            render_width_px: default_render_width(),
            external_timeout_secs: None,
            prompts_file: None,
            report_file: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            inference: InferenceConfig::from_env(),
            ocr_languages: std::env::var("OCR_LANGUAGES").unwrap_or(default.ocr_languages),
            render_width_px: std::env::var("RENDER_WIDTH_PX").ok().and_then(|v| v.parse().ok()).map(|w: u32| w.max(MIN_RENDER_WIDTH_PX)).unwrap_or(default.render_width_px),
            external_timeout_secs: std::env::var("EXTERNAL_TIMEOUT_SECS").ok().and_then(|v| v.parse::<u64>().ok()).filter(|s| *s > 0),
            prompts_file: non_empty_var("PROMPTS_FILE").map(PathBuf::from).or(default.prompts_file),
            report_file: std::env::var("REPORT_FILE").ok().filter(|v| !v.trim().is_empty()).map(PathBuf::from),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}

impl InferenceConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_key: std::env::var("LLM_API_KEY").unwrap_or(default.api_key),
            credentials_path: non_empty_var("KEY_FILE_PATH").map(PathBuf::from),
            api_base_url: non_empty_var("LLM_API_BASE_URL"),
            project_id: non_empty_var("PROJECT_ID"),
            location: non_empty_var("LOCATION"),
            model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.model_name),
            temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.temperature),
            max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse::<u32>().ok()).filter(|n| *n > 0).or(default.max_tokens),
        }
    }

    /// Endpoint the client talks to
    ///
    /// Without an explicit base URL this is the Vertex AI OpenAI-compatible
    /// endpoint of the configured project and location.
    pub fn resolved_base_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.api_base_url {
            return Ok(url.trim_end_matches('/').to_string());
        }

        let project = self.project_id.as_deref().ok_or_else(|| ConfigError::EnvVarNotFound {
            var_name: "PROJECT_ID".to_string(),
        })?;
        let location = self.location.as_deref().ok_or_else(|| ConfigError::EnvVarNotFound {
            var_name: "LOCATION".to_string(),
        })?;

        let host = if location == "global" {
            "aiplatform.googleapis.com".to_string()
        } else {
            format!("{}-aiplatform.googleapis.com", location)
        };

        Ok(format!(
            "https://{}/v1beta1/projects/{}/locations/{}/endpoints/openapi",
            host, project, location
        ))
    }

    /// Check that a client can be built from these settings
    ///
    /// Either a service-account key file or a static key is required.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials_path.is_none() && self.api_key.trim().is_empty() {
            return Err(ConfigError::EnvVarNotFound {
                var_name: "KEY_FILE_PATH or LLM_API_KEY".to_string(),
            });
        }
        self.resolved_base_url().map(|_| ())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
