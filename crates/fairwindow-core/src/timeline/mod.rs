//! Per-step weather timeline.
//!
//! This module provides:
//! - Hourly source records in provider units
//! - Centralized unit normalization
//! - Hold-forward expansion into a fixed-step, sorted timeline

mod builder;
mod record;
mod sample;
pub mod units;

pub use builder::{build_timeline, validate_step, TimelineBuilder};
pub use record::{AirQualityRecord, HourlyRecord};
pub use sample::{ConditionSample, Timeline};
pub use units::{Ratio, Temperature, WindSpeed};
