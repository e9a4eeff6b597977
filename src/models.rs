//! Request, response and provider payload types

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::DayMateError;

/// Maximum number of headlines taken from a news response
pub const MAX_HEADLINES: usize = 5;

/// Marker written into the prompt for a missing value
pub const ABSENT: &str = "None";

/// Body of `POST /plan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub location_name: Option<String>,
}

impl PlanRequest {
    /// Location shown in the prompt: the given name, or `lat,lon`
    #[must_use]
    pub fn location_label(&self) -> String {
        match self.location_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{},{}", format_float(self.lat), format_float(self.lon)),
        }
    }
}

/// Result of `POST /plan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub planning: String,
    pub prompt: String,
}

/// Format a float so whole numbers keep their fractional part (`23.0`)
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Current conditions pulled out of an OpenWeatherMap response
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    /// Human-readable description, e.g. "light rain"
    pub description: Option<String>,
    /// Condition group, e.g. "Rain" or "Clear"
    pub main_category: String,
    /// Temperature in Celsius, as the provider wrote it
    pub temperature: Option<Number>,
}

impl WeatherObservation {
    /// Extract the fields the planner needs from the raw provider body.
    ///
    /// Only a missing condition entry or `main` block is an error; a missing
    /// description or temperature is carried as absent.
    pub fn from_provider(body: &Value) -> Result<Self, DayMateError> {
        let payload = openweather::CurrentWeather::deserialize(body)
            .map_err(|e| DayMateError::malformed(format!("Unexpected weather payload: {e}")))?;

        let condition = payload
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| DayMateError::malformed("Weather payload has no conditions"))?;

        Ok(Self {
            description: condition.description,
            main_category: condition.main,
            temperature: payload.main.temp,
        })
    }

    #[must_use]
    pub fn description_label(&self) -> &str {
        self.description.as_deref().unwrap_or(ABSENT)
    }

    /// Integers stay integers, floats always show a fractional part
    #[must_use]
    pub fn temperature_label(&self) -> String {
        match &self.temperature {
            Some(temp) if temp.is_f64() => temp
                .as_f64()
                .map(format_float)
                .unwrap_or_else(|| temp.to_string()),
            Some(temp) => temp.to_string(),
            None => ABSENT.to_string(),
        }
    }
}

/// Up to [`MAX_HEADLINES`] titles; a missing title stays `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headlines(pub Vec<Option<String>>);

impl Headlines {
    /// Take the first article titles from a GNews response.
    /// A body without `articles` yields no headlines.
    #[must_use]
    pub fn from_provider(body: &Value) -> Self {
        let titles = body
            .get("articles")
            .and_then(Value::as_array)
            .map(|articles| {
                articles
                    .iter()
                    .take(MAX_HEADLINES)
                    .map(|article| {
                        article
                            .get("title")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self(titles)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().map(Option::as_deref)
    }

    /// Bracketed list used inside the prompt: `['First', None]`
    #[must_use]
    pub fn to_prompt_list(&self) -> String {
        let items: Vec<String> = self
            .iter()
            .map(|title| title.map_or_else(|| ABSENT.to_string(), quote_title))
            .collect();
        format!("[{}]", items.join(", "))
    }
}

impl<S: Into<String>> FromIterator<S> for Headlines {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| Some(s.into())).collect())
    }
}

/// Single-quote a title, switching to double quotes when the title holds a
/// single quote but no double quote
fn quote_title(title: &str) -> String {
    let quote = if title.contains('\'') && !title.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(title.len() + 2);
    quoted.push(quote);
    for c in title.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c == quote => {
                quoted.push('\\');
                quoted.push(c);
            }
            c => quoted.push(c),
        }
    }
    quoted.push(quote);
    quoted
}

/// `OpenWeatherMap` current-weather response structures
mod openweather {
    use serde::Deserialize;
    use serde_json::Number;

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeather {
        pub weather: Vec<Condition>,
        pub main: MainReadings,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        #[serde(default)]
        pub main: String,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainReadings {
        #[serde(default)]
        pub temp: Option<Number>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_label_prefers_name() {
        let req = PlanRequest {
            lat: 23.7104,
            lon: 90.40744,
            location_name: Some("Dhaka".to_string()),
        };
        assert_eq!(req.location_label(), "Dhaka");
    }

    #[test]
    fn test_location_label_falls_back_to_coordinates() {
        let req = PlanRequest {
            lat: 23.7104,
            lon: 90.40744,
            location_name: None,
        };
        assert_eq!(req.location_label(), "23.7104,90.40744");

        let empty = PlanRequest {
            location_name: Some(String::new()),
            ..req
        };
        assert_eq!(empty.location_label(), "23.7104,90.40744");
    }

    #[test]
    fn test_location_label_keeps_whole_number_fraction() {
        let req = PlanRequest {
            lat: 23.0,
            lon: -90.0,
            location_name: None,
        };
        assert_eq!(req.location_label(), "23.0,-90.0");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(23.0), "23.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(23.7104), "23.7104");
        assert_eq!(format_float(-0.5), "-0.5");
    }

    #[test]
    fn test_plan_request_without_location_name() {
        let req: PlanRequest = serde_json::from_value(json!({"lat": 1.5, "lon": 2.0})).unwrap();
        assert_eq!(req.location_name, None);
    }

    #[test]
    fn test_weather_observation_from_provider() {
        let body = json!({
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 27.4, "humidity": 88},
            "name": "Dhaka"
        });
        let obs = WeatherObservation::from_provider(&body).unwrap();
        assert_eq!(obs.description_label(), "light rain");
        assert_eq!(obs.main_category, "Rain");
        assert_eq!(obs.temperature_label(), "27.4");
    }

    #[test]
    fn test_temperature_label_follows_provider_number() {
        let body = json!({"weather": [{"main": "Clear", "description": "clear sky"}], "main": {"temp": 31.0}});
        let obs = WeatherObservation::from_provider(&body).unwrap();
        assert_eq!(obs.temperature_label(), "31.0");

        let body = json!({"weather": [{"main": "Clear", "description": "clear sky"}], "main": {"temp": 31}});
        let obs = WeatherObservation::from_provider(&body).unwrap();
        assert_eq!(obs.temperature_label(), "31");
    }

    #[test]
    fn test_missing_description_and_temperature_are_absent() {
        let body = json!({"weather": [{"main": "Haze"}], "main": {"humidity": 70}});
        let obs = WeatherObservation::from_provider(&body).unwrap();
        assert_eq!(obs.description_label(), "None");
        assert_eq!(obs.temperature_label(), "None");
        assert_eq!(obs.main_category, "Haze");
    }

    #[test]
    fn test_weather_observation_missing_fields() {
        let body = json!({"weather": [], "main": {"temp": 20.0}});
        let err = WeatherObservation::from_provider(&body).unwrap_err();
        assert!(matches!(err, DayMateError::MalformedResponse { .. }));

        let body = json!({"cod": 200});
        assert!(WeatherObservation::from_provider(&body).is_err());

        let body = json!({"weather": [{"main": "Rain", "description": "rain"}]});
        assert!(WeatherObservation::from_provider(&body).is_err());
    }

    #[test]
    fn test_headlines_take_first_five() {
        let articles: Vec<Value> = (1..=7)
            .map(|i| json!({"title": format!("Headline {i}")}))
            .collect();
        let headlines = Headlines::from_provider(&json!({"articles": articles}));
        assert_eq!(headlines.0.len(), MAX_HEADLINES);
        assert_eq!(headlines.0[4].as_deref(), Some("Headline 5"));
    }

    #[test]
    fn test_headlines_keep_missing_titles() {
        let body = json!({"articles": [{"title": "First"}, {"description": "no title"}]});
        let headlines = Headlines::from_provider(&body);
        assert_eq!(headlines.0, vec![Some("First".to_string()), None]);
        assert_eq!(headlines.to_prompt_list(), "['First', None]");
    }

    #[test]
    fn test_prompt_list_quoting() {
        let headlines: Headlines = ["It's raining", r#"Say "hi""#, r"C:\path"]
            .into_iter()
            .collect();
        assert_eq!(
            headlines.to_prompt_list(),
            r#"["It's raining", 'Say "hi"', 'C:\\path']"#
        );
    }

    #[test]
    fn test_headlines_without_articles() {
        let headlines = Headlines::from_provider(&json!({"totalArticles": 0}));
        assert!(headlines.0.is_empty());
        assert_eq!(headlines.to_prompt_list(), "[]");
    }
}
