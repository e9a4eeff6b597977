use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::{
    DayMateConfig, DayMateError, PlanComposer, PlanRequest, PlanResponse, PlanStrategy,
    news::NewsClient, weather::WeatherClient,
};

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    composer: Arc<PlanComposer>,
}

impl AppState {
    pub fn new(composer: PlanComposer) -> Self {
        Self {
            composer: Arc::new(composer),
        }
    }

    /// Build every provider client from configuration
    pub fn from_config(config: &DayMateConfig) -> crate::Result<Self> {
        let weather = WeatherClient::new(&config.weather)?;
        let news = NewsClient::new(&config.news)?;
        let strategy = PlanStrategy::from_config(&config.llm)?;
        Ok(Self::new(PlanComposer::new(weather, news, strategy)))
    }

    #[must_use]
    pub fn composer(&self) -> &PlanComposer {
        &self.composer
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub country: Option<String>,
    pub q: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/docs", get(docs))
        .route("/weather", get(get_weather))
        .route("/news", get(get_news))
        .route("/plan", post(generate_plan))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the DayMate API",
        "swagger_ui": "/docs",
        "docs_url": "/docs",
        "status": "running",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn docs() -> Json<Value> {
    Json(json!({
        "title": "DayMate API",
        "version": crate::VERSION,
        "endpoints": [
            {"method": "GET", "path": "/", "description": "Service information"},
            {"method": "GET", "path": "/health", "description": "Liveness check"},
            {"method": "GET", "path": "/weather", "query": ["lat", "lon"],
             "description": "Current weather from OpenWeatherMap"},
            {"method": "GET", "path": "/news", "query": ["country", "q"],
             "description": "Top headlines from GNews"},
            {"method": "POST", "path": "/plan", "body": ["lat", "lon", "location_name"],
             "description": "Daily plan built from weather and news"},
        ],
    }))
}

#[instrument(skip(state))]
async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<Value>, DayMateError> {
    let body = state.composer.weather().current(query.lat, query.lon).await?;
    Ok(Json(body))
}

#[instrument(skip(state))]
async fn get_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Value>, DayMateError> {
    let news = state.composer.news();
    let country = query
        .country
        .as_deref()
        .unwrap_or_else(|| news.default_country());
    let body = news.top_headlines(country, query.q.as_deref()).await?;
    Ok(Json(body))
}

#[instrument(skip(state))]
async fn generate_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, DayMateError> {
    let plan = state.composer.compose(&request).await?;
    Ok(Json(plan))
}
