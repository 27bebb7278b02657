//! Comfort factors and per-factor preferred ranges.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::timeline::ConditionSample;

/// One weather factor that contributes to the comfort score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Temperature,
    Wind,
    Uv,
    Aqi,
    Humidity,
    Cloud,
    Precipitation,
}

impl Factor {
    pub const ALL: [Factor; 7] = [
        Factor::Temperature,
        Factor::Wind,
        Factor::Uv,
        Factor::Aqi,
        Factor::Humidity,
        Factor::Cloud,
        Factor::Precipitation,
    ];

    /// Share of the geometric mean. The seven weights sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            Factor::Temperature => 0.30,
            Factor::Wind => 0.18,
            Factor::Uv => 0.12,
            Factor::Aqi => 0.12,
            Factor::Humidity => 0.12,
            Factor::Cloud => 0.08,
            Factor::Precipitation => 0.08,
        }
    }

    /// Exponential decay per unit outside the preferred range.
    pub fn decay(self) -> f64 {
        match self {
            Factor::Temperature => 0.08,
            Factor::Wind => 0.12,
            Factor::Uv => 0.35,
            Factor::Aqi => 0.03,
            Factor::Humidity => 0.04,
            Factor::Cloud => 0.03,
            Factor::Precipitation => 0.06,
        }
    }

    /// Range used when the caller leaves both bounds unset.
    pub fn default_band(self) -> ComfortBand {
        match self {
            Factor::Temperature => ComfortBand::between(45.0, 68.0),
            Factor::Wind => ComfortBand::at_most(12.0),
            Factor::Uv => ComfortBand::at_most(6.0),
            Factor::Aqi => ComfortBand::at_most(100.0),
            Factor::Humidity => ComfortBand::at_most(85.0),
            Factor::Cloud => ComfortBand::at_most(100.0),
            Factor::Precipitation => ComfortBand::at_most(30.0),
        }
    }

    /// Reading of this factor in `sample`, in engine units.
    pub fn read(self, sample: &ConditionSample) -> Option<f64> {
        match self {
            Factor::Temperature => sample.temperature_f,
            Factor::Wind => sample.wind_speed_mph,
            Factor::Uv => sample.uv_index,
            Factor::Aqi => sample.aqi,
            Factor::Humidity => sample.humidity_pct,
            Factor::Cloud => sample.cloud_pct,
            Factor::Precipitation => sample.precip_chance_pct,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Factor::Temperature => "temperature",
            Factor::Wind => "wind",
            Factor::Uv => "uv",
            Factor::Aqi => "aqi",
            Factor::Humidity => "humidity",
            Factor::Cloud => "cloud",
            Factor::Precipitation => "precipitation",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferred range for one factor. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComfortBand {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ComfortBand {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Distance of `value` outside the band, zero when inside.
    pub fn excess(&self, value: f64) -> f64 {
        if let Some(min) = self.min {
            if value < min {
                return min - value;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return value - max;
            }
        }
        0.0
    }

    /// 1 inside the band, `exp(-decay * excess)` outside.
    pub fn sub_score(&self, value: f64, decay: f64) -> f64 {
        let excess = self.excess(value);
        if excess <= 0.0 {
            1.0
        } else {
            (-decay * excess).exp()
        }
    }
}

/// Caller-supplied comfort preferences.
///
/// Each bound is optional; unset bounds fall back to [`Factor::default_band`].
/// Field aliases accept the camelCase payload shape (`tempMin`, `windMax`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSet {
    #[serde(alias = "tempMin", skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<f64>,
    #[serde(alias = "tempMax", skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<f64>,
    #[serde(alias = "windMin", skip_serializing_if = "Option::is_none")]
    pub wind_min: Option<f64>,
    #[serde(alias = "windMax", skip_serializing_if = "Option::is_none")]
    pub wind_max: Option<f64>,
    #[serde(alias = "uvMin", skip_serializing_if = "Option::is_none")]
    pub uv_min: Option<f64>,
    #[serde(alias = "uvMax", skip_serializing_if = "Option::is_none")]
    pub uv_max: Option<f64>,
    #[serde(alias = "aqiMin", skip_serializing_if = "Option::is_none")]
    pub aqi_min: Option<f64>,
    #[serde(alias = "aqiMax", skip_serializing_if = "Option::is_none")]
    pub aqi_max: Option<f64>,
    #[serde(alias = "humidityMin", skip_serializing_if = "Option::is_none")]
    pub humidity_min: Option<f64>,
    #[serde(alias = "humidityMax", skip_serializing_if = "Option::is_none")]
    pub humidity_max: Option<f64>,
    #[serde(alias = "cloudMin", skip_serializing_if = "Option::is_none")]
    pub cloud_min: Option<f64>,
    #[serde(alias = "cloudMax", skip_serializing_if = "Option::is_none")]
    pub cloud_max: Option<f64>,
    #[serde(alias = "precipMin", skip_serializing_if = "Option::is_none")]
    pub precip_min: Option<f64>,
    #[serde(alias = "precipMax", skip_serializing_if = "Option::is_none")]
    pub precip_max: Option<f64>,
}

impl PreferenceSet {
    fn bounds(&self, factor: Factor) -> (Option<f64>, Option<f64>) {
        match factor {
            Factor::Temperature => (self.temp_min, self.temp_max),
            Factor::Wind => (self.wind_min, self.wind_max),
            Factor::Uv => (self.uv_min, self.uv_max),
            Factor::Aqi => (self.aqi_min, self.aqi_max),
            Factor::Humidity => (self.humidity_min, self.humidity_max),
            Factor::Cloud => (self.cloud_min, self.cloud_max),
            Factor::Precipitation => (self.precip_min, self.precip_max),
        }
    }

    /// Effective band for `factor`, with each unset bound defaulted.
    pub fn band(&self, factor: Factor) -> ComfortBand {
        let (min, max) = self.bounds(factor);
        let fallback = factor.default_band();
        ComfortBand {
            min: min.or(fallback.min),
            max: max.or(fallback.max),
        }
    }

    /// Reject non-finite bounds and bands whose min exceeds their max.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for factor in Factor::ALL {
            let band = self.band(factor);
            for bound in [band.min, band.max].into_iter().flatten() {
                if !bound.is_finite() {
                    return Err(ValidationError::InvalidPreference {
                        factor: factor.to_string(),
                        min: band.min.unwrap_or(f64::NEG_INFINITY),
                        max: band.max.unwrap_or(f64::INFINITY),
                    });
                }
            }
            if let (Some(min), Some(max)) = (band.min, band.max) {
                if min > max {
                    return Err(ValidationError::InvalidPreference {
                        factor: factor.to_string(),
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = Factor::ALL.iter().map(|f| f.weight()).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn defaults_apply_when_unset() {
        let prefs = PreferenceSet::default();
        assert_eq!(prefs.band(Factor::Temperature), ComfortBand::between(45.0, 68.0));
        assert_eq!(prefs.band(Factor::Wind), ComfortBand::at_most(12.0));
        assert_eq!(prefs.band(Factor::Precipitation), ComfortBand::at_most(30.0));
    }

    #[test]
    fn single_bound_override_keeps_the_other_default() {
        let prefs = PreferenceSet {
            temp_min: Some(60.0),
            ..Default::default()
        };
        assert_eq!(prefs.band(Factor::Temperature), ComfortBand::between(60.0, 68.0));
    }

    #[test]
    fn camel_case_payload_is_accepted() {
        let prefs: PreferenceSet =
            serde_json::from_str(r#"{"tempMin": 60, "tempMax": 68, "windMax": 8}"#).unwrap();
        assert_eq!(prefs.temp_min, Some(60.0));
        assert_eq!(prefs.temp_max, Some(68.0));
        assert_eq!(prefs.wind_max, Some(8.0));
        assert_eq!(prefs.uv_max, None);
    }

    #[test]
    fn band_excess_is_two_sided() {
        let band = ComfortBand::between(45.0, 68.0);
        assert_eq!(band.excess(50.0), 0.0);
        assert_eq!(band.excess(40.0), 5.0);
        assert_eq!(band.excess(70.0), 2.0);
        assert_eq!(ComfortBand::at_most(12.0).excess(-3.0), 0.0);
    }

    #[test]
    fn inverted_band_is_rejected() {
        let prefs = PreferenceSet {
            temp_max: Some(40.0),
            ..Default::default()
        };
        let err = prefs.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPreference { ref factor, .. } if factor == "temperature"));
    }

    #[test]
    fn non_finite_bound_is_rejected() {
        let prefs = PreferenceSet {
            uv_max: Some(f64::NAN),
            ..Default::default()
        };
        assert!(prefs.validate().is_err());
        assert!(PreferenceSet::default().validate().is_ok());
    }
}
