use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::analysis::estimator::ProbabilityEstimator;
use crate::analysis::news::NewsLookup;
use crate::clients::{
    AnthropicClient, GoogleNewsRss, KalshiClient, MarketSource, NewsApiClient, NewsProvider,
};
use crate::config::Config;
use crate::types::{AnalysisResult, Market};
use crate::Result;

const LOG_TITLE_CHARS: usize = 50;

/// Drives market fetch, news lookup, estimation and scoring for one request.
pub struct Analyzer {
    markets: Arc<dyn MarketSource>,
    news: NewsLookup,
    estimator: ProbabilityEstimator,
    concurrency: usize,
}

impl Analyzer {
    pub fn new(
        markets: Arc<dyn MarketSource>,
        news: NewsLookup,
        estimator: ProbabilityEstimator,
        concurrency: usize,
    ) -> Self {
        Self {
            markets,
            news,
            estimator,
            concurrency: concurrency.max(1),
        }
    }

    /// Builds the production analyzer. Fails with a configuration error when
    /// the language model credential is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.anthropic_api_key()?;

        let ai_client = AnthropicClient::new(
            config.anthropic_api_base_url.clone(),
            api_key,
            config.anthropic_model.clone(),
            config.llm_timeout_secs,
        )?;

        let primary: Option<Arc<dyn NewsProvider>> = match &config.news_api_key {
            Some(key) => Some(Arc::new(NewsApiClient::new(
                config.news_api_base_url.clone(),
                key.clone(),
            )?)),
            None => None,
        };
        let fallback = Arc::new(GoogleNewsRss::new(config.google_news_rss_url.clone())?);

        Ok(Self::new(
            Arc::new(KalshiClient::new(config.kalshi_api_base_url.clone())?),
            NewsLookup::new(primary, fallback),
            ProbabilityEstimator::new(Arc::new(ai_client)),
            config.analysis_concurrency,
        ))
    }

    pub fn model_name(&self) -> &'static str {
        self.estimator.provider_name()
    }

    /// Unreachable market data yields no markets rather than an error.
    pub async fn fetch_open_markets(&self, limit: usize) -> Vec<Market> {
        match self.markets.open_markets(limit).await {
            Ok(markets) => markets,
            Err(e) => {
                warn!("Error fetching markets: {}", e);
                Vec::new()
            }
        }
    }

    /// One result per market, in market order. No single market can fail the
    /// run because news lookup and estimation both degrade.
    pub async fn run_analysis(&self, max_events: usize) -> Vec<AnalysisResult> {
        if max_events == 0 {
            return Vec::new();
        }

        let mut markets = self.fetch_open_markets(max_events).await;
        markets.truncate(max_events);

        stream::iter(markets)
            .map(|market| async move { self.analyze_market(&market).await })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn analyze_market(&self, market: &Market) -> AnalysisResult {
        info!(
            "Analyzing: {}",
            market.title.chars().take(LOG_TITLE_CHARS).collect::<String>()
        );

        let sources = self.news.search_news(&market.news_query()).await;
        let estimate = self.estimator.estimate(market, &sources).await;

        AnalysisResult::new(market, estimate, sources.len())
    }
}

/// Keeps results whose absolute edge reaches `min_edge`, strongest first.
pub fn rank_opportunities(results: &[AnalysisResult], min_edge: f64) -> Vec<AnalysisResult> {
    let mut ranked: Vec<AnalysisResult> = results
        .iter()
        .filter(|r| r.edge().abs() >= min_edge)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| b.edge().abs().total_cmp(&a.edge().abs()));
    ranked
}
