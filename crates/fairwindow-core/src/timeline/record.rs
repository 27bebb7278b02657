//! Hourly source records, still in provider units.
//!
//! Provider adapters produce these; the builder normalizes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::units::{Ratio, Temperature, WindSpeed};

/// One hour of weather as reported upstream.
///
/// `start` is `None` when the provider's timestamp could not be parsed; the
/// builder skips such records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub temperature: Option<Temperature>,
    #[serde(default)]
    pub wind_speed: Option<WindSpeed>,
    #[serde(default)]
    pub uv_index: Option<f64>,
    #[serde(default)]
    pub humidity: Option<Ratio>,
    #[serde(default)]
    pub cloud_cover: Option<Ratio>,
    #[serde(default)]
    pub precip_chance: Option<Ratio>,
}

impl HourlyRecord {
    /// A record starting at `start` with every reading absent.
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            ..Self::default()
        }
    }
}

/// One hour of air quality as reported upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQualityRecord {
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub aqi: Option<f64>,
}

impl AirQualityRecord {
    pub fn new(start: DateTime<Utc>, aqi: f64) -> Self {
        Self {
            start: Some(start),
            aqi: Some(aqi),
        }
    }
}
