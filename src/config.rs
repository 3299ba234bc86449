use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Hugging Face API key used as bearer credential for the model endpoint
    #[serde(default)]
    pub huggingface_api_key: Option<String>,

    /// Chat completions endpoint
    #[serde(default = "default_model_api_url")]
    pub model_api_url: String,

    /// Model identifier sent with every completion request
    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default = "default_max_tokens")]
    pub model_max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub model_temperature: f32,

    /// Upper bound on the outbound model call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub model_timeout_secs: u64,

    /// Optional JSON file replacing the built-in movie catalog
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_model_api_url() -> String {
    "https://router.huggingface.co/v1/chat/completions".to_string()
}

fn default_model_id() -> String {
    "meta-llama/Llama-3.2-3B-Instruct".to_string()
}

fn default_max_tokens() -> u32 {
    250
}

fn default_temperature() -> f32 {
    0.8
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars).context("Failed to load config")?;
        // An empty key is treated the same as a missing one
        Ok(Self {
            huggingface_api_key: config
                .huggingface_api_key
                .filter(|key| !key.trim().is_empty()),
            ..config
        })
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
