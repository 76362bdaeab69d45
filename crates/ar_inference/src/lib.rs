use std::fmt;
use std::time::Duration;

pub mod engine;
pub mod models;

pub use engine::{Rewrite, RewriteEngine};
pub use models::create_model;

/// Key value that ships in sample environments; treated as "no credential".
pub const PLACEHOLDER_API_KEY: &str = "dummy-key-for-demo";

#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_name: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Config {
    /// The credential, if one is genuinely configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.7,
            max_tokens: 1500,
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub mod prelude {
    pub use super::{Config, Rewrite, RewriteEngine};
    pub use super::models::create_model;
    pub use ar_core::{Error, Result, RewriteModel, RewriteRequest};
}
