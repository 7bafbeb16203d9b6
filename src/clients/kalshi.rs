use crate::types::Market;
use crate::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

const TIMEOUT_SECS: u64 = 15;
pub const MAX_MARKETS_PER_REQUEST: usize = 50;

#[derive(Debug, Deserialize)]
struct MarketsResponse {
    #[serde(default)]
    markets: Vec<Value>,
}

impl MarketsResponse {
    /// Decodes each entry on its own so one malformed market is skipped
    /// instead of failing the batch.
    fn into_markets(self, limit: usize) -> Vec<Market> {
        self.markets
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Market>(entry) {
                Ok(market) => Some(market),
                Err(e) => {
                    warn!("Skipping malformed Kalshi market: {}", e);
                    None
                }
            })
            .take(limit)
            .collect()
    }
}

fn request_limit(limit: usize) -> usize {
    limit.min(MAX_MARKETS_PER_REQUEST)
}

#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn open_markets(&self, limit: usize) -> Result<Vec<Market>>;
}

pub struct KalshiClient {
    client: Client,
    base_url: String,
}

impl KalshiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn open_markets_request(&self, limit: usize) -> reqwest::RequestBuilder {
        self.client.get(format!("{}/markets", self.base_url)).query(&[
            ("status", "open".to_string()),
            ("limit", request_limit(limit).to_string()),
        ])
    }
}

#[async_trait]
impl MarketSource for KalshiClient {
    async fn open_markets(&self, limit: usize) -> Result<Vec<Market>> {
        let response = self.open_markets_request(limit).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApi(format!(
                "Kalshi API returned {}: {}",
                status, error_text
            )));
        }

        let markets_response: MarketsResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse Kalshi response: {}", e)))?;

        Ok(markets_response.into_markets(request_limit(limit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(payload: &str, limit: usize) -> Vec<Market> {
        serde_json::from_str::<MarketsResponse>(payload)
            .unwrap()
            .into_markets(limit)
    }

    #[test]
    fn parses_markets_payload() {
        let payload = r#"{
            "cursor": "abc",
            "markets": [
                {"ticker": "KXHIGHNY-25", "title": "NYC high above 80F?", "subtitle": "Central Park", "yes_bid": 42, "volume": 100},
                {"ticker": "KXFED", "title": "Fed cuts in December?", "yes_bid": 0}
            ]
        }"#;
        let markets = parse(payload, 50);

        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].yes_bid, 42);
        assert_eq!(markets[1].subtitle, "");
        assert_eq!(markets[1].yes_bid, 0);
    }

    #[test]
    fn missing_markets_key_is_empty() {
        assert!(parse(r#"{"cursor": ""}"#, 50).is_empty());
    }

    #[test]
    fn null_fields_keep_the_market() {
        let payload = r#"{"markets": [
            {"ticker": "A", "title": "First", "subtitle": "x", "yes_bid": 40},
            {"ticker": "B", "title": "Second", "subtitle": null, "yes_bid": 60}
        ]}"#;
        let markets = parse(payload, 50);

        assert_eq!(markets.len(), 2);
        assert_eq!(markets[1].ticker, "B");
        assert_eq!(markets[1].subtitle, "");
    }

    #[test]
    fn malformed_market_is_skipped_not_fatal() {
        let payload = r#"{"markets": [
            {"ticker": "A", "title": "First", "yes_bid": 40},
            {"ticker": "B", "title": "Second", "yes_bid": "sixty"},
            "not an object",
            {"ticker": "C", "title": "Third", "yes_bid": 10}
        ]}"#;
        let tickers: Vec<String> = parse(payload, 50).into_iter().map(|m| m.ticker).collect();

        assert_eq!(tickers, vec!["A", "C"]);
    }

    #[test]
    fn parsed_markets_are_truncated_to_limit() {
        let entries: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"ticker": "M{}", "yes_bid": 50}}"#, i))
            .collect();
        let payload = format!(r#"{{"markets": [{}]}}"#, entries.join(","));

        assert_eq!(parse(&payload, 3).len(), 3);
    }

    #[test]
    fn request_limit_is_capped_at_fifty() {
        let client = KalshiClient::new("https://api.elections.kalshi.com/trade-api/v2").unwrap();

        let request = client.open_markets_request(100).build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.elections.kalshi.com/trade-api/v2/markets?status=open&limit=50"
        );

        let request = client.open_markets_request(7).build().unwrap();
        assert_eq!(request.url().query(), Some("status=open&limit=7"));
    }
}
