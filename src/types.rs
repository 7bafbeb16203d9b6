use serde::{Deserialize, Deserializer, Serialize};

use crate::analysis::edge::{classify, format_edge_percent};

// Market Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    #[serde(default = "not_available", deserialize_with = "or_not_available")]
    pub ticker: String,
    #[serde(default = "not_available", deserialize_with = "or_not_available")]
    pub title: String,
    #[serde(default, deserialize_with = "or_empty")]
    pub subtitle: String,
    /// Best YES bid in cents, i.e. the implied probability in percent.
    #[serde(default = "default_yes_bid", deserialize_with = "or_default_yes_bid")]
    pub yes_bid: i64,
}

fn not_available() -> String {
    "N/A".to_string()
}

fn default_yes_bid() -> i64 {
    50
}

// Kalshi sends explicit nulls for fields it has no value for.
fn or_not_available<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_else(not_available))
}

fn or_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn or_default_yes_bid<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(d)?.unwrap_or_else(default_yes_bid))
}

impl Market {
    pub fn price(&self) -> f64 {
        self.yes_bid as f64 / 100.0
    }

    pub fn news_query(&self) -> String {
        format!("{} {}", self.title, self.subtitle)
    }
}

// News Types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSource {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
}

// Model Estimate Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    #[serde(alias = "low", alias = "Low")]
    Low,
    #[serde(alias = "medium", alias = "Medium")]
    Medium,
    #[serde(alias = "high", alias = "High")]
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub estimated_probability: f64,
    pub confidence: Confidence,
    pub reasoning: String,
}

impl Estimate {
    pub const NEUTRAL_PROBABILITY: f64 = 0.5;

    /// Neutral estimate substituted whenever the model cannot be consulted.
    pub fn fallback(err: impl std::fmt::Display) -> Self {
        Self {
            estimated_probability: Self::NEUTRAL_PROBABILITY,
            confidence: Confidence::Low,
            reasoning: format!("Error: {}", err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

// Analysis Result
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    ticker: String,
    title: String,
    market_price: f64,
    estimated_probability: f64,
    edge: f64,
    edge_percent: String,
    confidence: Confidence,
    recommendation: Recommendation,
    reasoning: String,
    sources_count: usize,
}

impl AnalysisResult {
    pub fn new(market: &Market, estimate: Estimate, sources_count: usize) -> Self {
        let market_price = market.price();
        let (edge, recommendation) = classify(market_price, &estimate);

        Self {
            ticker: market.ticker.clone(),
            title: market.title.clone(),
            market_price,
            estimated_probability: estimate.estimated_probability,
            edge,
            edge_percent: format_edge_percent(edge),
            confidence: estimate.confidence,
            recommendation,
            reasoning: estimate.reasoning,
            sources_count,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn market_price(&self) -> f64 {
        self.market_price
    }

    pub fn estimated_probability(&self) -> f64 {
        self.estimated_probability
    }

    pub fn edge(&self) -> f64 {
        self.edge
    }

    pub fn edge_percent(&self) -> &str {
        &self.edge_percent
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn sources_count(&self) -> usize {
        self.sources_count
    }
}

// Request Types
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    pub max_events: Option<usize>,
    pub min_edge: Option<f64>,
}

// Response Types
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub generated_at: String,
    pub total_analyzed: usize,
    pub total_opportunities: usize,
    pub results: Vec<AnalysisResult>,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub success: bool,
    pub message: String,
    pub instructions: String,
    pub results: Vec<AnalysisResult>,
    pub total_analyzed: usize,
    pub total_opportunities: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ResponseMetadata {
    pub timestamp: String,
    pub execution_time_ms: u64,
    pub model_used: Option<String>,
}
