//! LLM service - business capability layer
//!
//! Only responsible for "send this prompt and these documents, return the
//! answer". Which prompt belongs to which mode is decided elsewhere.
//!
//! ## Stack
//! - `async-openai` for the API calls
//! - any OpenAI-compatible endpoint; by default the Vertex AI one derived from
//!   project and location
//! - `gcp_auth` for access tokens when a service-account key file is configured

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartText,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, FinishReason,
    },
    Client,
};
use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use tracing::{debug, warn};

use crate::config::InferenceConfig;
use crate::error::{AppError, AppResult, ConfigError};
use crate::models::Document;

/// Inference collaborator
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Run `template` as the system instruction over `documents`
    async fn run_prompt(&self, template: &str, documents: &[Document]) -> AppResult<String>;
}

/// LLM service
///
/// Holds the client built from an explicit [`InferenceConfig`]; no process
/// environment is touched.
pub struct LlmService {
    openai_config: OpenAIConfig,
    client: Client<OpenAIConfig>,
    service_account: Option<CustomServiceAccount>,
    model_name: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

/// OAuth scope for Vertex AI calls
const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

impl LlmService {
    /// Create a new LLM service
    pub fn new(config: &InferenceConfig) -> AppResult<Self> {
        config.validate()?;
        let base_url = config.resolved_base_url()?;
        debug!("LLM endpoint: {}, model: {}", base_url, config.model_name);

        let service_account = match &config.credentials_path {
            Some(path) => {
                let account = CustomServiceAccount::from_file(path).map_err(|source| {
                    ConfigError::CredentialsUnreadable {
                        path: path.clone(),
                        source,
                    }
                })?;
                debug!("Using service-account credentials: {}", path.display());
                Some(account)
            }
            None => None,
        };

        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(base_url);

        Ok(Self {
            client: Client::with_config(openai_config.clone()),
            openai_config,
            service_account,
            model_name: config.model_name.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Client carrying a currently valid credential
    ///
    /// Service-account tokens are cached and refreshed by `gcp_auth`.
    async fn authorized_client(&self) -> AppResult<Client<OpenAIConfig>> {
        let Some(account) = &self.service_account else {
            return Ok(self.client.clone());
        };

        let token = account
            .token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| AppError::inference(&self.model_name, e))?;
        let config = self.openai_config.clone().with_api_key(token.as_str());
        Ok(Client::with_config(config))
    }

    fn build_messages(
        &self,
        template: &str,
        documents: &[Document],
    ) -> AppResult<Vec<ChatCompletionRequestMessage>> {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(template)
            .build()
            .map_err(|e| AppError::inference(&self.model_name, e))?;

        let content_parts: Vec<ChatCompletionRequestUserMessageContentPart> = document_parts(documents)
            .into_iter()
            .map(|text| {
                ChatCompletionRequestUserMessageContentPart::Text(
                    ChatCompletionRequestMessageContentPartText { text },
                )
            })
            .collect();

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()
            .map_err(|e| AppError::inference(&self.model_name, e))?;

        Ok(vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ])
    }
}

#[async_trait]
impl InferenceService for LlmService {
    async fn run_prompt(&self, template: &str, documents: &[Document]) -> AppResult<String> {
        debug!(
            "Calling LLM API, model: {}, documents: {}, prompt length: {}",
            self.model_name,
            documents.len(),
            template.chars().count()
        );

        let messages = self.build_messages(template, documents)?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature);
        if let Some(max_tokens) = self.max_tokens {
            args.max_completion_tokens(max_tokens);
        }
        let request = args
            .build()
            .map_err(|e| AppError::inference(&self.model_name, e))?;

        let client = self.authorized_client().await?;
        let response = client.chat().create(request).await.map_err(|e| {
            warn!("LLM API call failed: {}", e);
            AppError::inference(&self.model_name, e)
        })?;

        debug!("LLM API call succeeded");

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::inference(&self.model_name, "LLM returned no choices"))?;

        // A cut-off answer is not a result
        if matches!(choice.finish_reason, Some(FinishReason::Length)) {
            warn!("LLM output hit the token limit");
            return Err(AppError::inference(
                &self.model_name,
                "response truncated at the output token limit",
            ));
        }

        let content = choice
            .message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::inference(&self.model_name, "LLM returned no content"))?;

        Ok(content.trim().to_string())
    }
}

/// One labelled text part per document, in order
pub fn document_parts(documents: &[Document]) -> Vec<String> {
    documents.iter().map(Document::as_prompt_part).collect()
}
