use anyhow::Result;
use daymate::{AppState, DayMateConfig, logging, web};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = DayMateConfig::load()?;
    logging::init(&config.logging)?;

    if config.weather.api_key.is_none() {
        warn!("OPENWEATHER_KEY is not set; /weather and /plan will fail");
    }
    if config.news.api_key.is_none() {
        warn!("GNEWS_API_KEY is not set; /news and /plan will fail");
    }

    let state = AppState::from_config(&config)?;
    info!(
        version = daymate::VERSION,
        strategy = state.composer().strategy().name(),
        "Starting DayMate"
    );

    web::run(&config, state).await
}
