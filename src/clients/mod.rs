pub mod ai;
pub mod google_news;
pub mod kalshi;
pub mod news_api;

pub use ai::{AiClient, AnthropicClient};
pub use google_news::GoogleNewsRss;
pub use kalshi::{KalshiClient, MarketSource};
pub use news_api::NewsApiClient;

use crate::types::NewsSource;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<NewsSource>>;
    fn provider_name(&self) -> &'static str;
}
