//! Configuration management for the DayMate service
//!
//! Settings are layered: built-in defaults, an optional TOML file,
//! `DAYMATE_`-prefixed environment variables (`__` separates sections) and
//! finally the conventional provider variables (`OPENWEATHER_KEY`,
//! `GNEWS_API_KEY`, `GROQ_API_KEY`, `PORT`).

use crate::DayMateError;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "DAYMATE_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "daymate.toml";

/// Root configuration structure for the DayMate service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DayMateConfig {
    pub server: ServerConfig,
    pub weather: WeatherConfig,
    pub news: NewsConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// News provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// GNews API key
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Country used when a request names none
    pub default_country: String,
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider API key; without it plans come from the rule-based planner
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    pub model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Retries on transient failures
    pub max_retries: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_seconds: 10,
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_seconds: 10,
            default_country: "bd".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            timeout_seconds: 60,
            max_tokens: 350,
            max_retries: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl DayMateConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_from_env(std::env::vars().collect())
    }

    /// Load configuration from the given set of environment variables
    pub fn load_from_env(vars: HashMap<String, String>) -> Result<Self> {
        let config_file = vars
            .get(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut builder = Config::builder();

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("DAYMATE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );

        let port = vars.get("PORT").and_then(|p| p.parse::<i64>().ok());
        builder = builder
            .set_override_option("weather.api_key", vars.get("OPENWEATHER_KEY").cloned())?
            .set_override_option("news.api_key", vars.get("GNEWS_API_KEY").cloned())?
            .set_override_option("llm.api_key", vars.get("GROQ_API_KEY").cloned())?
            .set_override_option("server.port", port)?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DayMateConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.normalize_credentials();
        config.validate()?;

        Ok(config)
    }

    /// Treat empty credentials as missing; whitespace is kept as given
    pub fn normalize_credentials(&mut self) {
        for key in [
            &mut self.weather.api_key,
            &mut self.news.api_key,
            &mut self.llm.api_key,
        ] {
            if key.as_deref().is_some_and(str::is_empty) {
                *key = None;
            }
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, seconds) in [
            ("Weather", self.weather.timeout_seconds),
            ("News", self.news.timeout_seconds),
            ("LLM", self.llm.timeout_seconds),
        ] {
            if seconds == 0 || seconds > 300 {
                return Err(DayMateError::config(format!(
                    "{name} timeout must be between 1 and 300 seconds"
                ))
                .into());
            }
        }

        if self.llm.max_retries > 10 {
            return Err(DayMateError::config("LLM max retries cannot exceed 10").into());
        }

        if self.llm.max_tokens == 0 {
            return Err(DayMateError::config("LLM max tokens must be positive").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DayMateError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DayMateError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.llm.base_url.starts_with("http://") && !self.llm.base_url.starts_with("https://")
        {
            return Err(
                DayMateError::config("LLM base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        if self.news.default_country.trim().is_empty() {
            return Err(DayMateError::config("Default news country cannot be empty").into());
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = DayMateConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.news.timeout_seconds, 10);
        assert_eq!(config.news.default_country, "bd");
        assert_eq!(config.llm.timeout_seconds, 60);
        assert_eq!(config.llm.max_tokens, 350);
        assert_eq!(config.llm.max_retries, 2);
        assert_eq!(config.logging.level, "info");
        assert!(config.weather.api_key.is_none());
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_load_with_empty_environment() {
        let config = DayMateConfig::load_from_env(env(&[(
            CONFIG_PATH_VAR,
            "/nonexistent/daymate.toml",
        )]))
        .unwrap();
        assert!(config.weather.api_key.is_none());
        assert!(config.news.api_key.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_conventional_credential_variables() {
        let config = DayMateConfig::load_from_env(env(&[
            (CONFIG_PATH_VAR, "/nonexistent/daymate.toml"),
            ("OPENWEATHER_KEY", "owm-key"),
            ("GNEWS_API_KEY", "gnews-key"),
            ("GROQ_API_KEY", "groq-key"),
            ("PORT", "9100"),
        ]))
        .unwrap();
        assert_eq!(config.weather.api_key.as_deref(), Some("owm-key"));
        assert_eq!(config.news.api_key.as_deref(), Some("gnews-key"));
        assert_eq!(config.llm.api_key.as_deref(), Some("groq-key"));
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_prefixed_environment_override() {
        let config = DayMateConfig::load_from_env(env(&[
            (CONFIG_PATH_VAR, "/nonexistent/daymate.toml"),
            ("DAYMATE_LLM__MODEL", "llama-3.3-70b-versatile"),
            ("DAYMATE_NEWS__DEFAULT_COUNTRY", "us"),
        ]))
        .unwrap();
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.news.default_country, "us");
    }

    #[test]
    fn test_empty_credentials_are_missing() {
        let config = DayMateConfig::load_from_env(env(&[
            (CONFIG_PATH_VAR, "/nonexistent/daymate.toml"),
            ("OPENWEATHER_KEY", ""),
            ("GROQ_API_KEY", ""),
            ("GNEWS_API_KEY", "   "),
        ]))
        .unwrap();
        assert!(config.weather.api_key.is_none());
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.news.api_key.as_deref(), Some("   "));
    }

    #[test]
    fn test_dotenv_credentials_are_read() {
        let path = std::env::temp_dir().join(format!("daymate-test-{}.env", std::process::id()));
        std::fs::write(&path, "OPENWEATHER_KEY=owm_from_file\nPORT=9001\n").unwrap();

        let mut vars: HashMap<String, String> = dotenvy::from_path_iter(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        std::fs::remove_file(&path).unwrap();
        vars.insert(CONFIG_PATH_VAR.to_string(), "/nonexistent/daymate.toml".to_string());

        let config = DayMateConfig::load_from_env(vars).unwrap();
        assert_eq!(config.weather.api_key.as_deref(), Some("owm_from_file"));
        assert_eq!(config.server.port, 9001);
        assert!(config.news.api_key.is_none());
    }

    #[test]
    fn test_config_file_is_read() {
        let path = std::env::temp_dir().join(format!("daymate-test-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[server]\nport = 8123\n\n[llm]\nmax_tokens = 200\n",
        )
        .unwrap();

        let config = DayMateConfig::load_from_env(env(&[(
            CONFIG_PATH_VAR,
            path.to_str().unwrap(),
        )]))
        .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.server.port, 8123);
        assert_eq!(config.llm.max_tokens, 200);
        assert_eq!(config.llm.max_retries, 2);
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = DayMateConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = DayMateConfig::default();
        config.llm.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout must be between"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = DayMateConfig::default();
        config.llm.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }
}
