use std::sync::Arc;
use std::time::Duration;

use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
    models::{ChatMessage, ChatResponse},
    services::{filter, gateway::ModelGateway, prompt},
};

/// Most candidate movies offered to the model in one reply
pub const MAX_CANDIDATES: usize = 5;

/// Answers chat messages from the catalog and the model gateway
///
/// Holds no per-request state, so one instance is shared by all requests.
pub struct ChatService {
    catalog: Arc<Catalog>,
    gateway: Arc<dyn ModelGateway>,
    timeout: Duration,
}

impl ChatService {
    pub fn new(catalog: Arc<Catalog>, gateway: Arc<dyn ModelGateway>, timeout: Duration) -> Self {
        Self {
            catalog,
            gateway,
            timeout,
        }
    }

    /// Fails when the gateway lacks its credential
    pub fn ensure_configured(&self) -> AppResult<()> {
        if self.gateway.is_configured() {
            Ok(())
        } else {
            tracing::error!(provider = self.gateway.name(), "Model API key is not set");
            Err(AppError::Configuration(
                "HUGGINGFACE_API_KEY is not configured".to_string(),
            ))
        }
    }

    /// Produces a reply to `message` given the prior conversation
    ///
    /// The model call is bounded by the configured timeout; when it expires the
    /// in-flight request is dropped and `AppError::UpstreamTimeout` is returned.
    /// There are no retries.
    pub async fn answer(&self, message: &str, history: &[ChatMessage]) -> AppResult<ChatResponse> {
        let selection = filter::select_movies(message, self.catalog.movies());
        let mut candidates = selection.movies;
        candidates.truncate(MAX_CANDIDATES);

        let messages = prompt::build_messages(prompt::system_prompt(&candidates), history, message);

        tracing::info!(
            kind = ?selection.kind,
            candidates = candidates.len(),
            forwarded_history = messages.len() - 2,
            provider = self.gateway.name(),
            "Sending chat request to model"
        );

        let reply = match tokio::time::timeout(self.timeout, self.gateway.complete(&messages)).await
        {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs_f64(),
                    provider = self.gateway.name(),
                    "Model request timed out"
                );
                return Err(AppError::UpstreamTimeout);
            }
        };

        Ok(ChatResponse {
            message: reply,
            movies: candidates.into_iter().cloned().collect(),
        })
    }
}
