//! Pirate Weather (Dark Sky compatible) hourly forecast adapter.
//!
//! Requested with `units=si`: Celsius, meters per second, and humidity,
//! cloud cover and precipitation probability as fractions.

use serde_json::Value;
use url::Url;

use super::parse::{number, path, timestamp};
use super::WeatherProvider;
use crate::error::ProviderError;
use crate::timeline::{HourlyRecord, Ratio, Temperature, WindSpeed};

pub const DEFAULT_BASE_URL: &str = "https://api.pirateweather.net";

#[derive(Debug, Clone)]
pub struct PirateWeather {
    base_url: String,
}

impl PirateWeather {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for PirateWeather {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherProvider for PirateWeather {
    fn name(&self) -> &str {
        "pirate_weather"
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    fn forecast_url(
        &self,
        latitude: f64,
        longitude: f64,
        api_key: Option<&str>,
    ) -> Result<Url, ProviderError> {
        let key = api_key.ok_or_else(|| ProviderError::MissingApiKey(self.name().to_string()))?;
        let raw = format!(
            "{}/forecast/{}/{},{}",
            self.base_url.trim_end_matches('/'),
            key,
            latitude,
            longitude
        );
        let mut url = Url::parse(&raw).map_err(|e| ProviderError::InvalidUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("units", "si")
            .append_pair("exclude", "currently,minutely,daily,alerts");
        Ok(url)
    }

    fn parse_hourly(&self, payload: &Value) -> Vec<HourlyRecord> {
        let Some(data) = path(payload, "hourly.data").and_then(Value::as_array) else {
            tracing::warn!("Pirate Weather payload has no hourly.data array");
            return Vec::new();
        };

        data.iter()
            .map(|hour| HourlyRecord {
                start: timestamp(hour.get("time"), 0),
                temperature: number(hour.get("temperature")).map(Temperature::Celsius),
                wind_speed: number(hour.get("windSpeed")).map(WindSpeed::MetersPerSecond),
                uv_index: number(hour.get("uvIndex")),
                humidity: number(hour.get("humidity")).map(Ratio::Fraction),
                cloud_cover: number(hour.get("cloudCover")).map(Ratio::Fraction),
                precip_chance: number(hour.get("precipProbability")).map(Ratio::Fraction),
            })
            .collect()
    }
}
