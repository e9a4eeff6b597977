//! Daily plan composition: weather, then news, then the LLM or the
//! rule-based planner.

use tracing::{debug, info, instrument};

use crate::config::LlmConfig;
use crate::fallback::fallback_plan;
use crate::llm::LlmClient;
use crate::models::{Headlines, PlanRequest, PlanResponse, WeatherObservation};
use crate::news::NewsClient;
use crate::weather::WeatherClient;
use crate::Result;

/// System instruction sent with every LLM plan request
pub const SYSTEM_PROMPT: &str = "You are DayMate, a helpful daily planner.";

/// How the plan text is produced, decided once at startup
#[derive(Clone)]
pub enum PlanStrategy {
    Llm(LlmClient),
    Fallback,
}

impl PlanStrategy {
    /// Use the LLM when a credential is configured
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        match &config.api_key {
            Some(api_key) => Ok(Self::Llm(LlmClient::new(config, api_key.clone())?)),
            None => Ok(Self::Fallback),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PlanStrategy::Llm(_) => "llm",
            PlanStrategy::Fallback => "fallback",
        }
    }
}

/// Chains the provider calls into a plan
#[derive(Clone)]
pub struct PlanComposer {
    weather: WeatherClient,
    news: NewsClient,
    strategy: PlanStrategy,
}

impl PlanComposer {
    pub fn new(weather: WeatherClient, news: NewsClient, strategy: PlanStrategy) -> Self {
        Self {
            weather,
            news,
            strategy,
        }
    }

    #[must_use]
    pub fn strategy(&self) -> &PlanStrategy {
        &self.strategy
    }

    #[must_use]
    pub fn weather(&self) -> &WeatherClient {
        &self.weather
    }

    #[must_use]
    pub fn news(&self) -> &NewsClient {
        &self.news
    }

    /// Produce a plan. A failure in any step aborts the whole request; the
    /// news provider is only called once the weather call has succeeded.
    #[instrument(skip(self), fields(strategy = self.strategy.name()))]
    pub async fn compose(&self, request: &PlanRequest) -> Result<PlanResponse> {
        let weather_body = self.weather.current(request.lat, request.lon).await?;
        let observation = WeatherObservation::from_provider(&weather_body)?;

        let news_body = self
            .news
            .top_headlines(self.news.default_country(), None)
            .await?;
        let headlines = Headlines::from_provider(&news_body);

        let prompt = build_prompt(request, &observation, &headlines);
        debug!(%prompt, "Prompt built");

        let planning = match &self.strategy {
            PlanStrategy::Llm(llm) => llm.complete(SYSTEM_PROMPT, &prompt).await?,
            PlanStrategy::Fallback => fallback_plan(&observation.main_category, &headlines),
        };

        info!(headlines = headlines.0.len(), "Plan composed");
        Ok(PlanResponse { planning, prompt })
    }
}

/// Format the user message sent to the language model
#[must_use]
pub fn build_prompt(
    request: &PlanRequest,
    observation: &WeatherObservation,
    headlines: &Headlines,
) -> String {
    format!(
        "User is at {}. Weather: {}, temp {}°C. Top headlines: {}. \
         Generate a concise daily plan (3-6 items) and practical recommendations \
         (carry items, suggest reschedule if needed).",
        request.location_label(),
        observation.description_label(),
        observation.temperature_label(),
        headlines.to_prompt_list(),
    )
}
