use std::env;

use anyhow::Context;

/// Application configuration, read once at startup and passed by parameter.
///
/// Missing credentials are a startup-time fatal condition: requests must
/// never discover a half-configured process at runtime.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub openrouter_api_key: String,
    pub serper_api_key: String,
    pub generation_model: String,
    /// Fixed conversion rate from the request currency into INR, the
    /// settlement currency of every monetary field in the output.
    pub exchange_rate: f64,
    pub retry_base_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openrouter_api_key: env::var("OPENROUTER_API_KEY")
                .context("OPENROUTER_API_KEY not set")?,
            serper_api_key: env::var("SERPER_API_KEY").context("SERPER_API_KEY not set")?,
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "openai/gpt-4o-mini".to_string()),
            exchange_rate: env::var("EXCHANGE_RATE")
                .unwrap_or_else(|_| "83.5".to_string())
                .parse()
                .context("EXCHANGE_RATE must be a valid number")?,
            retry_base_delay_ms: env::var("RETRY_BASE_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("RETRY_BASE_DELAY_MS must be a valid number")?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
