//! Recommendation facade.
//!
//! Ties the pieces together for one request: validate, build the day's
//! timeline, bound it by civil twilight, score every sample once and search
//! for the best window. Fetching is the caller's job; this module only sees
//! records that were already retrieved.

use std::fmt::Write as _;

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::comfort::{ComfortScorer, PreferenceSet};
use crate::error::{Result, ValidationError};
use crate::solar::{civil_twilight, parse_time_zone, validate_location, TwilightWindow};
use crate::timeline::{validate_step, AirQualityRecord, HourlyRecord, TimelineBuilder};
use crate::window::{BestWindow, WindowOptimizer};

const CHART_WIDTH: usize = 20;

/// Everything needed to plan one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name of the location
    pub time_zone: String,
    pub duration_minutes: i64,
    pub step_minutes: u32,
    #[serde(default)]
    pub preferences: PreferenceSet,
    /// Picks the day: the timeline covers this UTC day and twilight is
    /// computed for its local date.
    pub now: DateTime<Utc>,
}

impl RecommendationRequest {
    /// A one-hour, five-minute-step request for the current day.
    pub fn new(latitude: f64, longitude: f64, time_zone: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            time_zone: time_zone.into(),
            duration_minutes: 60,
            step_minutes: 5,
            preferences: PreferenceSet::default(),
            now: Utc::now(),
        }
    }

    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_step(mut self, minutes: u32) -> Self {
        self.step_minutes = minutes;
        self
    }

    pub fn with_preferences(mut self, preferences: PreferenceSet) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Check every input and resolve the time zone.
    pub fn validate(&self) -> std::result::Result<Tz, ValidationError> {
        validate_location(self.latitude, self.longitude)?;
        if self.duration_minutes <= 0 {
            return Err(ValidationError::InvalidDuration(self.duration_minutes));
        }
        validate_step(self.step_minutes)?;
        let tz = parse_time_zone(&self.time_zone)?;
        self.preferences.validate()?;
        Ok(tz)
    }
}

/// Score of one timeline sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredSample {
    pub instant: DateTime<Utc>,
    pub score: u8,
    /// Inside `[dawn, dusk)`
    pub daylight: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Recommended,
    NoRecommendation,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Recommended => "recommended",
            Outcome::NoRecommendation => "no_recommendation",
        }
    }
}

/// Result of [`recommend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub twilight: TwilightWindow,
    pub best: Option<BestWindow>,
    pub series: Vec<ScoredSample>,
}

impl Recommendation {
    pub fn outcome(&self) -> Outcome {
        if self.best.is_some() {
            Outcome::Recommended
        } else {
            Outcome::NoRecommendation
        }
    }

    /// Scores of the daylight samples only.
    pub fn daylight_series(&self) -> impl Iterator<Item = &ScoredSample> {
        self.series.iter().filter(|s| s.daylight)
    }

    /// Hourly bar chart of daylight scores in `tz` local time.
    ///
    /// One row per local hour holding daylight samples, showing the mean
    /// score of that hour. Rows overlapping the best window end in `*`.
    pub fn render_ascii_chart(&self, tz: Tz) -> String {
        let mut rows: Vec<(DateTime<Tz>, u32, u32)> = Vec::new();
        for sample in self.daylight_series() {
            let local = sample.instant.with_timezone(&tz);
            let hour = local
                .with_minute(0)
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(local);
            match rows.last_mut() {
                Some((h, sum, count)) if *h == hour => {
                    *sum += u32::from(sample.score);
                    *count += 1;
                }
                _ => rows.push((hour, u32::from(sample.score), 1)),
            }
        }

        if rows.is_empty() {
            return "No daylight samples to chart\n".to_string();
        }

        let mut out = String::new();
        for (hour, sum, count) in rows {
            let average = (f64::from(sum) / f64::from(count)).round() as usize;
            let filled = (average * CHART_WIDTH + 50) / 100;
            let hour_utc = hour.with_timezone(&Utc);
            let marked = self.best.is_some_and(|b| {
                hour_utc < b.end && hour_utc + chrono::Duration::hours(1) > b.start
            });
            let _ = writeln!(
                out,
                "{} |{:<width$}| {:>3}{}",
                hour.format("%H:%M"),
                "#".repeat(filled),
                average,
                if marked { " *" } else { "" },
                width = CHART_WIDTH,
            );
        }
        out
    }
}

/// Recommend the most comfortable daylight window for `request`.
///
/// # Errors
///
/// Returns a validation error for out-of-range coordinates, a non-positive
/// duration, a step that does not divide 60, an unknown time zone or inverted
/// preference bounds. Missing or malformed weather data is not an error: it
/// yields a recommendation without a best window.
pub fn recommend(
    request: &RecommendationRequest,
    hourly: &[HourlyRecord],
    air_quality: &[AirQualityRecord],
) -> Result<Recommendation> {
    let tz = request.validate()?;

    let timeline = TimelineBuilder::new(request.step_minutes)?
        .for_day(request.now.date_naive())
        .build(hourly, air_quality);
    let twilight = civil_twilight(request.latitude, request.longitude, tz, request.now)?;
    if twilight.clamped {
        tracing::debug!(
            latitude = request.latitude,
            "Twilight clamped; sun does not cross the civil zenith"
        );
    }

    let scorer = ComfortScorer::new(&request.preferences);
    let scores: Vec<u8> = timeline.iter().map(|s| scorer.score(s)).collect();
    let best = WindowOptimizer::best_window_scored(
        &timeline,
        &scores,
        &twilight,
        request.duration_minutes,
    );

    match &best {
        Some(window) => tracing::info!(
            start = %window.start,
            end = %window.end,
            score = window.average_score,
            shortened = window.shortened,
            "Selected activity window"
        ),
        None => tracing::info!(
            samples = timeline.len(),
            "No daylight window could be ranked"
        ),
    }

    let series = timeline
        .iter()
        .zip(&scores)
        .map(|(sample, &score)| ScoredSample {
            instant: sample.instant,
            score,
            daylight: twilight.contains(sample.instant),
        })
        .collect();

    Ok(Recommendation {
        twilight,
        best,
        series,
    })
}
