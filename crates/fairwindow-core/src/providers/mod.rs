//! Forecast providers.
//!
//! Each upstream service implements [`WeatherProvider`] or
//! [`AirQualityProvider`]. Adapters only build URLs and turn JSON payloads
//! into [`HourlyRecord`]s; fetching lives in [`ForecastClient`]. Parsing is
//! lenient: a malformed payload yields no records and a bad field yields an
//! absent reading.

mod client;
pub mod open_meteo;
pub(crate) mod parse;
pub mod pirate_weather;

pub use client::ForecastClient;
pub use open_meteo::{OpenMeteo, OpenMeteoAirQuality};
pub use pirate_weather::PirateWeather;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::ProviderError;
use crate::timeline::{AirQualityRecord, HourlyRecord};

/// A source of hourly weather forecasts.
pub trait WeatherProvider: Send + Sync {
    /// Identifier used in configuration (e.g. "pirate_weather").
    fn name(&self) -> &str;

    /// Whether [`forecast_url`](Self::forecast_url) needs an API key.
    fn requires_api_key(&self) -> bool {
        false
    }

    /// URL of the hourly forecast for a location.
    fn forecast_url(
        &self,
        latitude: f64,
        longitude: f64,
        api_key: Option<&str>,
    ) -> Result<Url, ProviderError>;

    /// Extract hourly records from a forecast payload.
    fn parse_hourly(&self, payload: &Value) -> Vec<HourlyRecord>;
}

/// A source of hourly air-quality index forecasts.
pub trait AirQualityProvider: Send + Sync {
    fn name(&self) -> &str;

    fn air_quality_url(&self, latitude: f64, longitude: f64) -> Result<Url, ProviderError>;

    fn parse_hourly(&self, payload: &Value) -> Vec<AirQualityRecord>;
}

/// Provider selection and connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// "pirate_weather" or "open_meteo"
    pub weather: String,
    /// "open_meteo" or "none"
    pub air_quality: String,
    /// Overrides the weather provider's base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_base_url: Option<String>,
    /// Overrides the air-quality provider's base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality_base_url: Option<String>,
    /// Environment variable holding the weather API key
    pub api_key_env: String,
    /// Literal API key; takes precedence over `api_key_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            weather: "open_meteo".to_string(),
            air_quality: "open_meteo".to_string(),
            weather_base_url: None,
            air_quality_base_url: None,
            api_key_env: "PIRATE_WEATHER_API_KEY".to_string(),
            api_key: None,
            timeout_seconds: 20,
        }
    }
}

impl ProviderConfig {
    /// The configured API key, from the literal value or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Instantiate the configured weather provider.
    pub fn weather_provider(&self) -> Result<Box<dyn WeatherProvider>, ProviderError> {
        weather_provider(&self.weather, self.weather_base_url.as_deref())
    }

    /// Instantiate the configured air-quality provider, if any.
    pub fn air_quality_provider(&self) -> Result<Option<Box<dyn AirQualityProvider>>, ProviderError> {
        air_quality_provider(&self.air_quality, self.air_quality_base_url.as_deref())
    }
}

/// Look up a weather provider by name.
pub fn weather_provider(
    name: &str,
    base_url: Option<&str>,
) -> Result<Box<dyn WeatherProvider>, ProviderError> {
    match name {
        "pirate_weather" | "pirateweather" => Ok(Box::new(match base_url {
            Some(url) => PirateWeather::with_base_url(url),
            None => PirateWeather::new(),
        })),
        "open_meteo" | "openmeteo" => Ok(Box::new(match base_url {
            Some(url) => OpenMeteo::with_base_url(url),
            None => OpenMeteo::new(),
        })),
        other => Err(ProviderError::UnknownProvider(other.to_string())),
    }
}

/// Look up an air-quality provider by name; "none" disables air quality.
pub fn air_quality_provider(
    name: &str,
    base_url: Option<&str>,
) -> Result<Option<Box<dyn AirQualityProvider>>, ProviderError> {
    match name {
        "none" | "" => Ok(None),
        "open_meteo" | "openmeteo" => Ok(Some(Box::new(match base_url {
            Some(url) => OpenMeteoAirQuality::with_base_url(url),
            None => OpenMeteoAirQuality::new(),
        }))),
        other => Err(ProviderError::UnknownProvider(other.to_string())),
    }
}
