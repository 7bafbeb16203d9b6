use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::clients::ai::prompts::build_estimate_prompt;
use crate::clients::AiClient;
use crate::types::{Estimate, Market, NewsSource};
use crate::{AppError, Result};

static CODE_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?").expect("valid code fence regex"));

#[derive(Clone)]
pub struct ProbabilityEstimator {
    client: Arc<dyn AiClient>,
}

impl ProbabilityEstimator {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self { client }
    }

    pub fn provider_name(&self) -> &'static str {
        self.client.provider_name()
    }

    /// Always yields an estimate. Model or parse failures degrade to
    /// [`Estimate::fallback`].
    pub async fn estimate(&self, market: &Market, sources: &[NewsSource]) -> Estimate {
        match self.try_estimate(market, sources).await {
            Ok(estimate) => estimate,
            Err(e) => {
                warn!(ticker = %market.ticker, "Estimate failed: {}", e);
                Estimate::fallback(e)
            }
        }
    }

    async fn try_estimate(&self, market: &Market, sources: &[NewsSource]) -> Result<Estimate> {
        let prompt = build_estimate_prompt(market, sources);
        let text = self.client.complete(&prompt).await?;
        parse_estimate(&text)
    }
}

pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE_RE.replace_all(text, "").trim().to_string()
}

pub fn parse_estimate(text: &str) -> Result<Estimate> {
    let cleaned = strip_code_fences(text);
    let estimate: Estimate = serde_json::from_str(&cleaned)
        .map_err(|e| AppError::MalformedResponse(format!("Invalid estimate JSON: {}", e)))?;

    let p = estimate.estimated_probability;
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(AppError::MalformedResponse(format!(
            "estimated_probability out of range: {}",
            p
        )));
    }

    Ok(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct CannedClient(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl AiClient for CannedClient {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.0
                .map(str::to_string)
                .map_err(|e| AppError::ExternalApi(e.to_string()))
        }

        fn provider_name(&self) -> &'static str {
            "canned"
        }
    }

    fn market() -> Market {
        Market {
            ticker: "KXGDP".to_string(),
            title: "GDP above 2%?".to_string(),
            subtitle: String::new(),
            yes_bid: 45,
        }
    }

    const VALID: &str =
        r#"{"estimated_probability": 0.62, "confidence": "MEDIUM", "reasoning": "Strong jobs data"}"#;

    #[test]
    fn fenced_json_parses_like_bare_json() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(parse_estimate(&fenced).unwrap(), parse_estimate(VALID).unwrap());

        let bare_fence = format!("```\n{}```", VALID);
        assert_eq!(parse_estimate(&bare_fence).unwrap(), parse_estimate(VALID).unwrap());
    }

    #[test]
    fn parses_all_three_keys() {
        let estimate = parse_estimate(VALID).unwrap();
        assert_eq!(estimate.estimated_probability, 0.62);
        assert_eq!(estimate.confidence, Confidence::Medium);
        assert_eq!(estimate.reasoning, "Strong jobs data");
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = parse_estimate(r#"{"estimated_probability": 0.3, "confidence": "LOW"}"#);
        assert!(matches!(err, Err(AppError::MalformedResponse(_))));
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let err = parse_estimate(
            r#"{"estimated_probability": 1.4, "confidence": "HIGH", "reasoning": "sure"}"#,
        );
        assert!(matches!(err, Err(AppError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn malformed_output_falls_back_to_neutral() {
        let estimator = ProbabilityEstimator::new(Arc::new(CannedClient(Ok(
            "I think it's about 60% likely.",
        ))));

        let estimate = estimator.estimate(&market(), &[]).await;

        assert_eq!(estimate.estimated_probability, 0.5);
        assert_eq!(estimate.confidence, Confidence::Low);
        assert!(estimate.reasoning.starts_with("Error:"));
    }

    #[tokio::test]
    async fn client_error_falls_back_to_neutral() {
        let estimator =
            ProbabilityEstimator::new(Arc::new(CannedClient(Err("connection reset"))));

        let estimate = estimator.estimate(&market(), &[]).await;

        assert_eq!(estimate.estimated_probability, 0.5);
        assert_eq!(estimate.confidence, Confidence::Low);
        assert!(estimate.reasoning.starts_with("Error:"));
        assert!(estimate.reasoning.contains("connection reset"));
    }

    #[tokio::test]
    async fn valid_output_passes_through() {
        let estimator = ProbabilityEstimator::new(Arc::new(CannedClient(Ok(VALID))));
        let estimate = estimator.estimate(&market(), &[]).await;
        assert_eq!(estimate.estimated_probability, 0.62);
    }
}
