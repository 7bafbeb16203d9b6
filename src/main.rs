use kalshi_edge::analysis::Analyzer;
use kalshi_edge::api;
use kalshi_edge::config::Config;
use kalshi_edge::AppError;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kalshi_edge=debug,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{}", e))?;

    let analyzer = match Analyzer::from_config(&config) {
        Ok(analyzer) => Some(Arc::new(analyzer)),
        Err(AppError::Configuration(msg)) => {
            tracing::warn!("Analysis disabled: {}", msg);
            None
        }
        Err(e) => return Err(anyhow::anyhow!("{}", e)),
    };
    tracing::info!(
        news_api = config.news_api_key.is_some(),
        concurrency = config.analysis_concurrency,
        "Analyzer configured"
    );

    let app = api::create_app(Arc::new(api::AppState { analyzer }));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
