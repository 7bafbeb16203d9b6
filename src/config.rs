//! Service configuration loaded from environment variables.

use serde::Deserialize;

use crate::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Credential for the language model. Analysis is unavailable without it.
    #[serde(default)]
    pub anthropic_api_key: Option<String>,

    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,

    #[serde(default = "default_anthropic_base_url")]
    pub anthropic_api_base_url: String,

    /// Optional NewsAPI key. When absent only the RSS feed is searched.
    #[serde(default)]
    pub news_api_key: Option<String>,

    #[serde(default = "default_news_api_base_url")]
    pub news_api_base_url: String,

    #[serde(default = "default_google_news_rss_url")]
    pub google_news_rss_url: String,

    #[serde(default = "default_kalshi_base_url")]
    pub kalshi_api_base_url: String,

    /// Number of markets analyzed at the same time.
    #[serde(default = "default_concurrency")]
    pub analysis_concurrency: usize,

    #[serde(default = "default_llm_timeout")]
    pub llm_timeout_secs: u64,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_news_api_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_google_news_rss_url() -> String {
    "https://news.google.com/rss/search".to_string()
}

fn default_kalshi_base_url() -> String {
    "https://api.elections.kalshi.com/trade-api/v2".to_string()
}

fn default_concurrency() -> usize {
    4
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config: Config = envy::from_env()
            .map_err(|e| AppError::Configuration(format!("Invalid environment: {}", e)))?;
        Ok(config.normalized())
    }

    /// Blank credentials are treated as missing.
    fn normalized(mut self) -> Self {
        self.anthropic_api_key = non_blank(self.anthropic_api_key);
        self.news_api_key = non_blank(self.news_api_key);
        self.kalshi_api_base_url = trim_base_url(&self.kalshi_api_base_url);
        self.news_api_base_url = trim_base_url(&self.news_api_base_url);
        self.anthropic_api_base_url = trim_base_url(&self.anthropic_api_base_url);
        self.analysis_concurrency = self.analysis_concurrency.max(1);
        self
    }

    pub fn anthropic_api_key(&self) -> Result<&str> {
        self.anthropic_api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration(MISSING_LLM_KEY.to_string()))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            anthropic_model: default_anthropic_model(),
            anthropic_api_base_url: default_anthropic_base_url(),
            news_api_key: None,
            news_api_base_url: default_news_api_base_url(),
            google_news_rss_url: default_google_news_rss_url(),
            kalshi_api_base_url: default_kalshi_base_url(),
            analysis_concurrency: default_concurrency(),
            llm_timeout_secs: default_llm_timeout(),
            host: default_host(),
            port: default_port(),
        }
    }
}

pub const MISSING_LLM_KEY: &str = "ANTHROPIC_API_KEY not configured";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trim_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
