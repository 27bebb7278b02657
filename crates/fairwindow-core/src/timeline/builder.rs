//! Hourly records to a fixed-step timeline.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use super::record::{AirQualityRecord, HourlyRecord};
use super::sample::{ConditionSample, Timeline};
use crate::error::ValidationError;

const MINUTES_PER_HOUR: u32 = 60;

/// Expands hourly weather into per-step samples for one UTC day.
///
/// Each hour is held forward unchanged across its 60 minutes. Air quality is
/// joined on exact start-time equality.
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    step_minutes: u32,
    day: NaiveDate,
}

impl TimelineBuilder {
    /// Builder for the UTC day containing now.
    pub fn new(step_minutes: u32) -> Result<Self, ValidationError> {
        validate_step(step_minutes)?;
        Ok(Self {
            step_minutes,
            day: Utc::now().date_naive(),
        })
    }

    /// Restrict to a different UTC day.
    pub fn for_day(mut self, day: NaiveDate) -> Self {
        self.day = day;
        self
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// `[00:00, 24:00)` UTC of the builder's day.
    pub fn day_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.from_utc_datetime(&self.day.and_time(NaiveTime::MIN));
        (start, start + Duration::days(1))
    }

    pub fn build(&self, hourly: &[HourlyRecord], air_quality: &[AirQualityRecord]) -> Timeline {
        let (day_start, day_end) = self.day_bounds();
        let aqi_by_hour = index_air_quality(air_quality);

        let mut samples = Vec::with_capacity(hourly.len() * self.samples_per_hour());
        let mut skipped = 0usize;

        for record in hourly {
            let Some(start) = record.start else {
                skipped += 1;
                continue;
            };
            if start < day_start || start >= day_end {
                continue;
            }

            let base = normalize(start, record, aqi_by_hour.get(&start.timestamp()).copied());
            for i in 0..self.samples_per_hour() {
                let instant = start + Duration::minutes((i as u32 * self.step_minutes) as i64);
                if instant >= day_end {
                    break;
                }
                samples.push(base.at(instant));
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} hourly records without a usable timestamp", skipped);
        }

        Timeline::new(self.step_minutes, samples)
    }

    fn samples_per_hour(&self) -> usize {
        (MINUTES_PER_HOUR / self.step_minutes) as usize
    }
}

/// Accept only steps that split an hour into whole samples, so consecutive
/// hours stay exactly one step apart.
pub fn validate_step(step_minutes: u32) -> Result<(), ValidationError> {
    if step_minutes == 0 || MINUTES_PER_HOUR % step_minutes != 0 {
        return Err(ValidationError::InvalidStep(step_minutes));
    }
    Ok(())
}

/// Build a timeline for the UTC day containing now.
pub fn build_timeline(
    hourly: &[HourlyRecord],
    air_quality: &[AirQualityRecord],
    step_minutes: u32,
) -> Result<Timeline, ValidationError> {
    Ok(TimelineBuilder::new(step_minutes)?.build(hourly, air_quality))
}

fn index_air_quality(records: &[AirQualityRecord]) -> HashMap<i64, f64> {
    let mut by_hour = HashMap::with_capacity(records.len());
    for record in records {
        if let (Some(start), Some(aqi)) = (record.start, finite(record.aqi)) {
            by_hour.entry(start.timestamp()).or_insert(aqi);
        }
    }
    by_hour
}

fn normalize(start: DateTime<Utc>, record: &HourlyRecord, aqi: Option<f64>) -> ConditionSample {
    ConditionSample {
        instant: start,
        temperature_f: finite(record.temperature.map(|t| t.fahrenheit())),
        wind_speed_mph: finite(record.wind_speed.map(|w| w.mph())),
        uv_index: finite(record.uv_index),
        aqi,
        humidity_pct: finite(record.humidity.map(|r| r.percent())),
        cloud_pct: finite(record.cloud_cover.map(|r| r.percent())),
        precip_chance_pct: finite(record.precip_chance.map(|r| r.percent())),
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
