use pitch_deck_analyzer::{
    api::start_server, config::AppConfig, generator::GeminiClient, pipeline::Analyzer,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    if config.gemini.api_key.is_empty() {
        warn!("GEMINI_API_KEY not set; pitch deck analysis will be reported as unavailable");
    }

    info!("Pitch Deck Analyzer - API Server");
    info!(port = config.port, model = %config.gemini.model, valuation = ?config.valuation.model, "Configuration loaded");

    let generator = GeminiClient::new(&config.gemini)?;
    let analyzer = Arc::new(Analyzer::new(Box::new(generator), config.valuation.clone()));

    start_server(analyzer, config.port, config.max_upload_bytes).await?;

    Ok(())
}
