//! Unit normalization.
//!
//! Every conversion from a provider's native units to the engine's units
//! (°F, mph, percent) goes through this module.

use serde::{Deserialize, Serialize};

const MPS_TO_MPH: f64 = 2.236936;
const KPH_TO_MPH: f64 = 0.621371;

/// Convert degrees Celsius to degrees Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert meters per second to miles per hour.
pub fn meters_per_second_to_mph(mps: f64) -> f64 {
    mps * MPS_TO_MPH
}

/// Convert kilometers per hour to miles per hour.
pub fn kilometers_per_hour_to_mph(kph: f64) -> f64 {
    kph * KPH_TO_MPH
}

/// Convert a `[0, 1]` fraction to a percentage.
pub fn fraction_to_percent(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Air temperature in the unit the provider reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum Temperature {
    Celsius(f64),
    Fahrenheit(f64),
}

impl Temperature {
    pub fn fahrenheit(self) -> f64 {
        match self {
            Temperature::Celsius(c) => celsius_to_fahrenheit(c),
            Temperature::Fahrenheit(f) => f,
        }
    }
}

/// Wind speed in the unit the provider reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum WindSpeed {
    MetersPerSecond(f64),
    KilometersPerHour(f64),
    MilesPerHour(f64),
}

impl WindSpeed {
    pub fn mph(self) -> f64 {
        match self {
            WindSpeed::MetersPerSecond(v) => meters_per_second_to_mph(v),
            WindSpeed::KilometersPerHour(v) => kilometers_per_hour_to_mph(v),
            WindSpeed::MilesPerHour(v) => v,
        }
    }
}

/// Humidity, cloud cover or precipitation chance, either as a fraction or
/// already as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    Fraction(f64),
    Percent(f64),
}

impl Ratio {
    pub fn percent(self) -> f64 {
        match self {
            Ratio::Fraction(f) => fraction_to_percent(f),
            Ratio::Percent(p) => p,
        }
    }
}
