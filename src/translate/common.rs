use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TranslateConfig;
use crate::error::{GlossaError, Result};
use super::CompletionClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self { role: "system".to_string(), content: content.to_string() }
    }

    pub fn user(content: &str) -> Self {
        Self { role: "user".to_string(), content: content.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self { format_type: "json_object".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice
    pub fn into_content(self) -> Result<String> {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GlossaError::Translation("Completion returned no content".to_string()))?;

        if content.trim().is_empty() {
            return Err(GlossaError::Translation("Empty completion received".to_string()));
        }
        Ok(content)
    }
}

/// Chat completion client for OpenAI-compatible APIs (Groq by default)
pub struct ChatCompletionClient {
    client: Client,
    config: TranslateConfig,
    api_key: String,
}

impl ChatCompletionClient {
    /// Build the client once at startup; fails if the API key is not set
    pub fn new(config: TranslateConfig) -> Result<Self> {
        let api_key = config.api_key()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config, api_key })
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, system_prompt: &str, user_content: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(user_content)],
            response_format: ResponseFormat::json_object(),
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete_json(&self, system_prompt: &str, user_content: &str) -> Result<String> {
        let request = self.build_request(system_prompt, user_content);
        let url = format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'));

        debug!(model = %self.config.model, content_len = user_content.len(), "Sending completion request to: {}", url);

        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GlossaError::Api { status, body });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion.into_content()?;

        debug!("Raw completion content: {}", content);
        Ok(content)
    }
}

/// Check that the API key is set and the configured model is served by the endpoint
pub async fn check_model_availability(config: &TranslateConfig) -> Result<()> {
    let api_key = config.api_key()?;
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    let url = format!("{}/models/{}", config.endpoint.trim_end_matches('/'), config.model);

    let response = client
        .get(&url)
        .bearer_auth(api_key)
        .send()
        .await
        .map_err(|e| GlossaError::Translation(format!("Failed to connect to {}: {}", config.endpoint, e)))?;

    if response.status().is_success() {
        info!("Model '{}' is available at {}", config.model, config.endpoint);
        Ok(())
    } else {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(GlossaError::Api { status, body })
    }
}
