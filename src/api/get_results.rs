use axum::Json;

use crate::types::ResultsResponse;

/// Results are not persisted, so this always returns the empty placeholder.
pub async fn handler() -> Json<ResultsResponse> {
    Json(ResultsResponse {
        success: true,
        message: "No cached results available yet. Click \"Run New Analysis\" to generate results."
            .to_string(),
        instructions: "Use the \"Run New Analysis\" button to analyze current Kalshi markets."
            .to_string(),
        results: Vec::new(),
        total_analyzed: 0,
        total_opportunities: 0,
    })
}
