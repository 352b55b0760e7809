use finance_forecast_server::{
    api::{start_server, ApiState},
    config::Config,
    gemini::GeminiClient,
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

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    if !config.has_api_key() {
        warn!("⚠️  GEMINI_API_KEY not set in .env, /analyze will fail until it is configured");
        warn!("📌 See .env.example for setup instructions");
    }

    info!("🚀 Finance Forecast Service - API Server");
    info!("📍 Port: {}", config.port);
    info!("🤖 Model: {}", config.model_id);

    let generator = Arc::new(GeminiClient::from_config(&config)?);
    let port = config.port;
    let state = ApiState::new(config, generator);

    info!("📡 Starting API server...");

    start_server(state, port).await?;

    Ok(())
}
