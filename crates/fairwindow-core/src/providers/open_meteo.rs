//! Open-Meteo forecast and air-quality adapters.
//!
//! Open-Meteo returns parallel arrays under `hourly`, one per variable, with
//! the unit of each variable under `hourly_units`.

use serde_json::Value;
use url::Url;

use super::parse::{number, path, timestamp};
use super::{AirQualityProvider, WeatherProvider};
use crate::error::ProviderError;
use crate::timeline::{AirQualityRecord, HourlyRecord, Ratio, Temperature, WindSpeed};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com";

const HOURLY_VARIABLES: &str = "temperature_2m,wind_speed_10m,uv_index,relative_humidity_2m,cloud_cover,precipitation_probability";

#[derive(Debug, Clone)]
pub struct OpenMeteo {
    base_url: String,
}

impl OpenMeteo {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_FORECAST_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenMeteo {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherProvider for OpenMeteo {
    fn name(&self) -> &str {
        "open_meteo"
    }

    fn forecast_url(
        &self,
        latitude: f64,
        longitude: f64,
        _api_key: Option<&str>,
    ) -> Result<Url, ProviderError> {
        let mut url = endpoint(&self.base_url, "v1/forecast")?;
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("hourly", HOURLY_VARIABLES)
            .append_pair("wind_speed_unit", "ms")
            .append_pair("timezone", "UTC")
            .append_pair("forecast_days", "2");
        Ok(url)
    }

    fn parse_hourly(&self, payload: &Value) -> Vec<HourlyRecord> {
        let Some(times) = path(payload, "hourly.time").and_then(Value::as_array) else {
            tracing::warn!("Open-Meteo payload has no hourly.time array");
            return Vec::new();
        };
        let offset = number(payload.get("utc_offset_seconds")).unwrap_or(0.0) as i64;

        let column = |name: &str| path(payload, &format!("hourly.{name}")).and_then(Value::as_array);
        let unit = |name: &str| {
            path(payload, &format!("hourly_units.{name}"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let at = |col: Option<&Vec<Value>>, i: usize| number(col.and_then(|c| c.get(i)));

        let temperature = column("temperature_2m");
        let wind = column("wind_speed_10m");
        let uv = column("uv_index");
        let humidity = column("relative_humidity_2m");
        let cloud = column("cloud_cover");
        let precip = column("precipitation_probability");

        let temperature_unit = unit("temperature_2m");
        let wind_unit = unit("wind_speed_10m");

        times
            .iter()
            .enumerate()
            .map(|(i, time)| HourlyRecord {
                start: timestamp(Some(time), offset),
                temperature: at(temperature, i).and_then(|v| temperature_in(&temperature_unit, v)),
                wind_speed: at(wind, i).and_then(|v| wind_in(&wind_unit, v)),
                uv_index: at(uv, i),
                humidity: at(humidity, i).map(Ratio::Percent),
                cloud_cover: at(cloud, i).map(Ratio::Percent),
                precip_chance: at(precip, i).map(Ratio::Percent),
            })
            .collect()
    }
}

/// Open-Meteo air-quality API, US AQI per hour.
#[derive(Debug, Clone)]
pub struct OpenMeteoAirQuality {
    base_url: String,
}

impl OpenMeteoAirQuality {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_AIR_QUALITY_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenMeteoAirQuality {
    fn default() -> Self {
        Self::new()
    }
}

impl AirQualityProvider for OpenMeteoAirQuality {
    fn name(&self) -> &str {
        "open_meteo"
    }

    fn air_quality_url(&self, latitude: f64, longitude: f64) -> Result<Url, ProviderError> {
        let mut url = endpoint(&self.base_url, "v1/air-quality")?;
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("hourly", "us_aqi")
            .append_pair("timezone", "UTC")
            .append_pair("forecast_days", "2");
        Ok(url)
    }

    fn parse_hourly(&self, payload: &Value) -> Vec<AirQualityRecord> {
        let (Some(times), Some(aqi)) = (
            path(payload, "hourly.time").and_then(Value::as_array),
            path(payload, "hourly.us_aqi").and_then(Value::as_array),
        ) else {
            tracing::warn!("Open-Meteo air-quality payload has no hourly.time/us_aqi arrays");
            return Vec::new();
        };
        let offset = number(payload.get("utc_offset_seconds")).unwrap_or(0.0) as i64;

        times
            .iter()
            .enumerate()
            .map(|(i, time)| AirQualityRecord {
                start: timestamp(Some(time), offset),
                aqi: number(aqi.get(i)),
            })
            .collect()
    }
}

fn endpoint(base_url: &str, route: &str) -> Result<Url, ProviderError> {
    let raw = format!("{}/{}", base_url.trim_end_matches('/'), route);
    Url::parse(&raw).map_err(|e| ProviderError::InvalidUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })
}

fn temperature_in(unit: &str, value: f64) -> Option<Temperature> {
    match unit {
        "°C" | "" => Some(Temperature::Celsius(value)),
        "°F" => Some(Temperature::Fahrenheit(value)),
        other => {
            tracing::debug!("Unsupported Open-Meteo temperature unit '{}'", other);
            None
        }
    }
}

fn wind_in(unit: &str, value: f64) -> Option<WindSpeed> {
    match unit {
        "m/s" => Some(WindSpeed::MetersPerSecond(value)),
        "km/h" | "" => Some(WindSpeed::KilometersPerHour(value)),
        "mp/h" | "mph" => Some(WindSpeed::MilesPerHour(value)),
        other => {
            tracing::debug!("Unsupported Open-Meteo wind unit '{}'", other);
            None
        }
    }
}
