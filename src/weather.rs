//! OpenWeatherMap current-conditions client

use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::WeatherConfig;
use crate::{DayMateError, Result};

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Client for the weather provider's current-conditions endpoint
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Self::new_with_base_url(config, OPENWEATHER_BASE_URL)
    }

    /// Create a client against a different host, e.g. a mock server
    pub fn new_with_base_url(config: &WeatherConfig, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current conditions in metric units; the body is returned as-is
    #[instrument(skip(self))]
    pub async fn current(&self, lat: f64, lon: f64) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DayMateError::config("OPENWEATHER_KEY not configured"))?;

        let url = Url::parse_with_params(
            &format!("{}/weather", self.base_url),
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ],
        )
        .map_err(|e| DayMateError::config(format!("Invalid weather API URL: {e}")))?;

        debug!("Calling the weather API");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(%status, "Weather API returned an error");
            return Err(DayMateError::upstream(status.as_u16(), "Weather API error"));
        }

        response
            .json()
            .await
            .map_err(|e| DayMateError::malformed(format!("Weather API returned invalid JSON: {e}")))
    }
}
