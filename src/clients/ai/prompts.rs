use crate::types::{Market, NewsSource};

const MAX_PROMPT_SOURCES: usize = 5;

pub fn build_estimate_prompt(market: &Market, sources: &[NewsSource]) -> String {
    let source_lines = sources
        .iter()
        .take(MAX_PROMPT_SOURCES)
        .enumerate()
        .map(|(i, s)| format!("{}. {}: {}", i + 1, s.source, s.title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Event: {}
Ticker: {}
Current Market Price: {}%

Recent Sources:
{}

Analyze this prediction market and provide your estimate in JSON:
{{
    "estimated_probability": <0-1>,
    "confidence": "LOW|MEDIUM|HIGH",
    "reasoning": "<brief explanation>"
}}

RESPOND ONLY WITH VALID JSON."#,
        market.title, market.ticker, market.yes_bid, source_lines
    )
}
