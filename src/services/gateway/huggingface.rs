//! Hugging Face router provider
//!
//! Speaks the OpenAI-compatible chat completions protocol exposed at
//! `https://router.huggingface.co/v1/chat/completions`.

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::ChatMessage,
    services::gateway::{ModelGateway, FALLBACK_REPLY},
};

#[derive(Clone)]
pub struct HuggingFaceGateway {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl HuggingFaceGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: config.huggingface_api_key.clone(),
            api_url: config.model_api_url.clone(),
            model: config.model_id.clone(),
            max_tokens: config.model_max_tokens,
            temperature: config.model_temperature,
        }
    }

    fn request_body<'a>(&'a self, messages: &'a [ChatMessage]) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Extracts the first completion's text, substituting the fallback when it is missing or empty
    fn extract_reply(response: CompletionResponse) -> String {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}

#[async_trait::async_trait]
impl ModelGateway for HuggingFaceGateway {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration("HUGGINGFACE_API_KEY is not configured".to_string())
        })?;

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::UpstreamTimeout
                } else {
                    AppError::HttpClient(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                provider = self.name(),
                "Model API returned an error"
            );
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let response_text = response.text().await?;
        let completion: CompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                tracing::error!(
                    error = %e,
                    response = %response_text,
                    "Failed to deserialize model response"
                );
                AppError::Internal(format!("Failed to parse model response: {}", e))
            })?;

        tracing::info!(provider = self.name(), "Model response received");

        Ok(Self::extract_reply(completion))
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}
