use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

use crate::analysis::rank_opportunities;
use crate::api::AppState;
use crate::config::MISSING_LLM_KEY;
use crate::types::{AnalyzeParams, AnalyzeResponse, ResponseMetadata};
use crate::{AppError, Result};

pub const DEFAULT_MAX_EVENTS: usize = 10;
pub const MAX_EVENTS_CAP: usize = 15;
pub const DEFAULT_MIN_EDGE: f64 = 0.05;

pub async fn handler(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<AnalyzeParams>, QueryRejection>,
) -> Result<Json<AnalyzeResponse>> {
    let start = Instant::now();

    let analyzer = state
        .analyzer
        .clone()
        .ok_or_else(|| AppError::Configuration(MISSING_LLM_KEY.to_string()))?;

    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    let max_events = params.max_events.unwrap_or(DEFAULT_MAX_EVENTS).min(MAX_EVENTS_CAP);
    let min_edge = params.min_edge.unwrap_or(DEFAULT_MIN_EDGE);
    if !min_edge.is_finite() {
        return Err(AppError::Validation("min_edge must be a finite number".to_string()));
    }

    tracing::info!(max_events, min_edge, "Starting analysis");

    let results = analyzer.run_analysis(max_events).await;
    let opportunities = rank_opportunities(&results, min_edge);

    tracing::info!(
        analyzed = results.len(),
        "Analysis complete: {} opportunities found",
        opportunities.len()
    );

    let now = Utc::now().to_rfc3339();
    Ok(Json(AnalyzeResponse {
        success: true,
        generated_at: now.clone(),
        total_analyzed: results.len(),
        total_opportunities: opportunities.len(),
        results: opportunities,
        metadata: ResponseMetadata {
            timestamp: now,
            execution_time_ms: start.elapsed().as_millis() as u64,
            model_used: Some(analyzer.model_name().to_string()),
        },
    }))
}
