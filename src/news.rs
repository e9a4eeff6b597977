//! GNews top-headlines client

use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::NewsConfig;
use crate::models::MAX_HEADLINES;
use crate::{DayMateError, Result};

const GNEWS_BASE_URL: &str = "https://gnews.io/api/v4";

/// Client for the news provider's top-headlines endpoint
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    default_country: String,
}

impl NewsClient {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        Self::new_with_base_url(config, GNEWS_BASE_URL)
    }

    /// Create a client against a different host, e.g. a mock server
    pub fn new_with_base_url(config: &NewsConfig, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_country: config.default_country.clone(),
        })
    }

    /// Country used when the caller gives none
    #[must_use]
    pub fn default_country(&self) -> &str {
        &self.default_country
    }

    /// Fetch general English headlines for a country, optionally filtered by
    /// a search query. The body is returned as-is.
    #[instrument(skip(self))]
    pub async fn top_headlines(&self, country: &str, query: Option<&str>) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DayMateError::config("GNEWS_API_KEY not configured"))?;

        let mut params = vec![
            ("apikey", api_key.to_string()),
            ("category", "general".to_string()),
            ("lang", "en".to_string()),
            ("max", MAX_HEADLINES.to_string()),
            ("country", country.to_string()),
        ];
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }

        let url = Url::parse_with_params(&format!("{}/top-headlines", self.base_url), &params)
            .map_err(|e| DayMateError::config(format!("Invalid news API URL: {e}")))?;

        debug!("Calling the news API");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            warn!(%status, "News API returned an error");
            return Err(DayMateError::upstream(
                status.as_u16(),
                format!("GNews API error: {error_text}"),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| DayMateError::malformed(format!("News API returned invalid JSON: {e}")))
    }
}
