//! wikirelay-api - HTTP API server for wikirelay

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wikirelay_api::{router, AppState};
use wikirelay_core::{ContentConfig, GeminiConfig, GenerationBackend};
use wikirelay_gateway::ContentClient;
use wikirelay_inference::{GeminiBackend, QuerySynthesizer, ResultRanker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   RUST_LOG    - standard env filter (default: "wikirelay=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wikirelay=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Configuration is read once here and injected; nothing reads the
    // environment after startup.
    let content_config = ContentConfig::from_env()?;
    let gemini_config = GeminiConfig::from_env()?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(wikirelay_core::defaults::PORT);

    info!(
        platform = %content_config.base_url,
        space_key = %content_config.space_key,
        model = %gemini_config.model,
        "Configuration loaded"
    );

    let backend: Arc<dyn GenerationBackend> = Arc::new(GeminiBackend::new(gemini_config));
    let state = AppState {
        content: Arc::new(ContentClient::new(content_config)),
        synthesizer: Arc::new(QuerySynthesizer::new(Arc::clone(&backend))),
        ranker: Arc::new(ResultRanker::new(backend)),
    };

    let app = router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
