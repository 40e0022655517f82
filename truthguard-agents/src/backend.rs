//! LLM backend abstraction
//!
//! Supports OpenAI-compatible APIs (OpenAI, Perplexity, local servers),
//! Anthropic Claude, and OpenAI-style vision completions.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use base64::Engine;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use truthguard_core::MediaFile;

/// Suffix added to the system role when the fallback backend answers
pub const FALLBACK_SYSTEM_NOTE: &str =
    " (Note: This is a fallback analysis as the primary service is unavailable.)";

/// Suffix added to answers produced by the fallback backend
pub const FALLBACK_ANSWER_NOTE: &str = " [Analysis provided by fallback service]";

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const PERPLEXITY_API_BASE: &str = "https://api.perplexity.ai";

/// LLM backend errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Empty response")]
    EmptyResponse,
}

/// Generic LLM backend trait
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a completion with system prompt, capped at `max_tokens`
    async fn generate(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Backend that can look at an image
#[async_trait]
pub trait VisionBackend: Send + Sync {
    async fn describe(
        &self,
        system: &str,
        prompt: &str,
        image: &MediaFile,
        max_tokens: u32,
    ) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

/// OpenAI-compatible backend configuration
#[derive(Debug, Clone)]
pub struct OpenAIBackendConfig {
    /// API key
    pub api_key: String,
    /// Base URL (for Perplexity, local servers, etc.)
    pub base_url: Option<String>,
    /// Model name
    pub model: String,
    /// Temperature (0.0 - 2.0)
    pub temperature: f32,
}

impl Default for OpenAIBackendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: "gpt-4o".to_string(),
            temperature: 0.0,
        }
    }
}

impl OpenAIBackendConfig {
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            ..Default::default()
        }
    }

    /// Perplexity's OpenAI-compatible chat API
    pub fn perplexity(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: Some(PERPLEXITY_API_BASE.to_string()),
            model: "r1-1776".to_string(),
            ..Default::default()
        }
    }

    pub fn local(base_url: &str, model: &str) -> Self {
        Self {
            api_key: "sk-local".to_string(),
            base_url: Some(base_url.to_string()),
            model: model.to_string(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

/// OpenAI-compatible LLM backend
pub struct OpenAIBackend {
    client: Client<OpenAIConfig>,
    config: OpenAIBackendConfig,
}

impl OpenAIBackend {
    pub fn new(config: OpenAIBackendConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config(format!("missing API key for model {}", config.model)));
        }

        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        let client = Client::with_config(openai_config);

        Ok(Self { client, config })
    }
}

#[async_trait]
impl LlmBackend for OpenAIBackend {
    async fn generate(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(|e| LlmError::Api(e.to_string()))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()
                    .map_err(|e| LlmError::Api(e.to_string()))?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature)
            .max_tokens(max_tokens)
            .build()
            .map_err(|e| LlmError::Api(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or(LlmError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Anthropic Claude backend configuration
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key
    pub api_key: String,
    /// Model name (e.g., claude-3-5-sonnet-20241022)
    pub model: String,
}

impl AnthropicConfig {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

/// Anthropic Claude backend
pub struct AnthropicBackend {
    client: reqwest::Client,
    config: AnthropicConfig,
}

impl AnthropicBackend {
    pub fn new(config: AnthropicConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("missing Anthropic API key".to_string()));
        }
        let client = reqwest::Client::new();
        Ok(Self { client, config })
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn generate(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "system": system,
            "messages": [
                {"role": "user", "content": user}
            ]
        });

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        let json = read_json_response(response, "Anthropic").await?;

        json["content"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|block| block["text"].as_str())
            .map(|s| s.to_string())
            .ok_or(LlmError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Primary backend with a single retry against a fallback.
///
/// The fallback sees the system role with [`FALLBACK_SYSTEM_NOTE`] appended,
/// and its answer is returned with [`FALLBACK_ANSWER_NOTE`] appended.
pub struct FallbackBackend {
    primary: SharedBackend,
    fallback: SharedBackend,
}

impl FallbackBackend {
    pub fn new(primary: SharedBackend, fallback: SharedBackend) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl LlmBackend for FallbackBackend {
    async fn generate(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError> {
        match self.primary.generate(system, user, max_tokens).await {
            Ok(answer) => Ok(answer),
            Err(e) => {
                warn!(
                    "{} failed ({}), falling back to {}",
                    self.primary.model_name(),
                    e,
                    self.fallback.model_name()
                );
                let system = format!("{}{}", system, FALLBACK_SYSTEM_NOTE);
                let answer = self.fallback.generate(&system, user, max_tokens).await?;
                Ok(format!("{}{}", answer, FALLBACK_ANSWER_NOTE))
            }
        }
    }

    fn model_name(&self) -> &str {
        self.primary.model_name()
    }
}

/// Vision backend configuration
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    pub model: String,
}

impl VisionConfig {
    pub fn openai(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: OPENAI_API_BASE.to_string(),
            model: "gpt-4o".to_string(),
        }
    }
}

/// OpenAI-style vision completions over reqwest, images sent as base64 data URLs
pub struct OpenAIVisionBackend {
    client: reqwest::Client,
    config: VisionConfig,
}

impl OpenAIVisionBackend {
    pub fn new(config: VisionConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("missing API key for vision backend".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            config,
        })
    }
}

/// `data:` URL carrying the file's bytes
pub fn image_data_url(image: &MediaFile) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
    format!("data:image/{};base64,{}", image.subtype(), encoded)
}

#[async_trait]
impl VisionBackend for OpenAIVisionBackend {
    async fn describe(
        &self,
        system: &str,
        prompt: &str,
        image: &MediaFile,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": [
                    {"type": "text", "text": prompt},
                    {"type": "image_url", "image_url": {"url": image_data_url(image)}}
                ]}
            ]
        });

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        let json = read_json_response(response, "Vision").await?;

        json["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(|s| s.to_string())
            .ok_or(LlmError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

async fn read_json_response(response: reqwest::Response, provider: &str) -> Result<serde_json::Value, LlmError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(LlmError::RateLimited);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(LlmError::Api(format!("{} API error {}: {}", provider, status, text)));
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::Api(e.to_string()))
}

/// Thread-safe reference to an LLM backend
pub type SharedBackend = Arc<dyn LlmBackend>;

/// Thread-safe reference to a vision backend
pub type SharedVisionBackend = Arc<dyn VisionBackend>;

/// Create a shared OpenAI-compatible backend
pub fn create_backend(config: OpenAIBackendConfig) -> Result<SharedBackend, LlmError> {
    Ok(Arc::new(OpenAIBackend::new(config)?))
}

/// Create a shared Anthropic backend
pub fn create_anthropic_backend(config: AnthropicConfig) -> Result<SharedBackend, LlmError> {
    Ok(Arc::new(AnthropicBackend::new(config)?))
}

/// Create a shared primary/fallback pair
pub fn create_fallback_backend(primary: SharedBackend, fallback: SharedBackend) -> SharedBackend {
    Arc::new(FallbackBackend::new(primary, fallback))
}

/// Create a shared vision backend
pub fn create_vision_backend(config: VisionConfig) -> Result<SharedVisionBackend, LlmError> {
    Ok(Arc::new(OpenAIVisionBackend::new(config)?))
}
