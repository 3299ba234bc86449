//! Language-model gateway abstraction
//!
//! The chat service only needs "messages in, one text reply out". Providers
//! implement this trait so the service can be exercised against stubs.

use crate::{error::AppResult, models::ChatMessage};

pub mod huggingface;

pub use huggingface::HuggingFaceGateway;

/// Reply used when the model answers without any text
pub const FALLBACK_REPLY: &str = "I'm having trouble generating a response. Please try again!";

/// Trait for text-completion providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ModelGateway: Send + Sync {
    /// Sends the full message sequence and returns the first completion's text
    ///
    /// Performs a single attempt. Non-success statuses are surfaced as
    /// `AppError::Upstream` with the provider's status and body.
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String>;

    /// Whether the credential needed to call the provider is present
    fn is_configured(&self) -> bool {
        true
    }

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
