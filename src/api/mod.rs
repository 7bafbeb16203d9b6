pub mod analyze;
pub mod get_results;

use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, MethodRouter},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::analysis::Analyzer;
use crate::types::StatusResponse;

static ANALYZE_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];
static RESULTS_METHODS: [Method; 2] = [Method::GET, Method::OPTIONS];

#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when the language model credential is not configured.
    pub analyzer: Option<Arc<Analyzer>>,
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/analyze",
            with_cors(
                get(analyze::handler).post(analyze::handler),
                &ANALYZE_METHODS,
            ),
        )
        .route(
            "/api/get-results",
            with_cors(get(get_results::handler), &RESULTS_METHODS),
        )
        .route("/health", get(health_check))
}

/// Router with cache and tracing layers applied.
pub fn create_app(state: Arc<AppState>) -> Router {
    create_router()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wraps the endpoint's existing methods in CORS and answers OPTIONS itself.
/// `CorsLayer` intercepts every OPTIONS request, so the OPTIONS route is added
/// after the layer and sets its own CORS headers.
fn with_cors(
    router: MethodRouter<Arc<AppState>>,
    methods: &'static [Method],
) -> MethodRouter<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(methods.to_vec())
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    router
        .layer(cors)
        .options(move || async move { preflight(methods) })
}

fn preflight(methods: &[Method]) -> impl IntoResponse {
    let allow_methods = methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    (
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
            (header::ACCESS_CONTROL_ALLOW_METHODS, allow_methods),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                "Content-Type, Authorization".to_string(),
            ),
        ],
        Json(StatusResponse { status: "ok" }),
    )
}

async fn health_check() -> &'static str {
    "OK"
}
