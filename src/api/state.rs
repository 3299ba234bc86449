use std::sync::Arc;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::services::{ChatService, HuggingFaceGateway, ModelGateway};

/// Shared application state
///
/// Everything in here is read-only after startup, so handlers never lock.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub chat: Arc<ChatService>,
}

impl AppState {
    /// Creates state around an explicit model gateway
    pub fn new(catalog: Catalog, gateway: Arc<dyn ModelGateway>, model_timeout: Duration) -> Self {
        let catalog = Arc::new(catalog);
        let chat = ChatService::new(catalog.clone(), gateway, model_timeout);
        Self {
            catalog,
            chat: Arc::new(chat),
        }
    }

    /// Creates state backed by the Hugging Face gateway described by `config`
    pub fn from_config(config: &Config, catalog: Catalog) -> Self {
        let gateway = Arc::new(HuggingFaceGateway::new(config));
        Self::new(catalog, gateway, config.model_timeout())
    }
}
