//! DayMate - daily planning from current weather and news headlines
//!
//! The service fetches conditions from OpenWeatherMap and headlines from
//! GNews, then asks a language model for a plan, or falls back to a
//! rule-based planner when no model credential is configured.

pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod llm;
pub mod logging;
pub mod models;
pub mod news;
pub mod planner;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::DayMateConfig;
pub use error::DayMateError;
pub use models::{Headlines, PlanRequest, PlanResponse, WeatherObservation};
pub use planner::{PlanComposer, PlanStrategy};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DayMateError>;
