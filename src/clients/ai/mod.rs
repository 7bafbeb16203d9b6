pub mod anthropic;
pub mod prompts;

pub use anthropic::AnthropicClient;

use crate::Result;
use async_trait::async_trait;

/// Single-turn text completion against a language model.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
    fn provider_name(&self) -> &'static str;
}
