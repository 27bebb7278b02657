//! Normalized per-step samples and the timeline that holds them.

use std::ops::Range;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::solar::TwilightWindow;

/// Weather conditions at one instant, in engine units.
///
/// A `None` field means the factor is unknown and will not be penalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionSample {
    pub instant: DateTime<Utc>,
    #[serde(default)]
    pub temperature_f: Option<f64>,
    #[serde(default)]
    pub wind_speed_mph: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<f64>,
    #[serde(default)]
    pub aqi: Option<f64>,
    #[serde(default)]
    pub humidity_pct: Option<f64>,
    #[serde(default)]
    pub cloud_pct: Option<f64>,
    #[serde(default)]
    pub precip_chance_pct: Option<f64>,
}

impl ConditionSample {
    /// A sample with every factor absent.
    pub fn empty(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            temperature_f: None,
            wind_speed_mph: None,
            uv_index: None,
            aqi: None,
            humidity_pct: None,
            cloud_pct: None,
            precip_chance_pct: None,
        }
    }

    /// Copy of this sample moved to another instant.
    pub fn at(&self, instant: DateTime<Utc>) -> Self {
        Self { instant, ..*self }
    }
}

/// Ordered, fixed-step sequence of samples with no duplicate instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    step_minutes: u32,
    samples: Vec<ConditionSample>,
}

impl Timeline {
    /// Build a timeline, restoring ordering and dropping duplicate instants
    /// (the first occurrence wins).
    pub fn new(step_minutes: u32, mut samples: Vec<ConditionSample>) -> Self {
        samples.sort_by_key(|s| s.instant);
        samples.dedup_by_key(|s| s.instant);
        Self {
            step_minutes,
            samples,
        }
    }

    pub fn empty(step_minutes: u32) -> Self {
        Self {
            step_minutes,
            samples: Vec::new(),
        }
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    pub fn step(&self) -> Duration {
        Duration::minutes(self.step_minutes as i64)
    }

    pub fn samples(&self) -> &[ConditionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionSample> {
        self.samples.iter()
    }

    /// Index range of the samples inside `[dawn, dusk)`.
    pub fn daylight_range(&self, twilight: &TwilightWindow) -> Range<usize> {
        let start = self.samples.partition_point(|s| s.instant < twilight.dawn);
        let end = self.samples.partition_point(|s| s.instant < twilight.dusk);
        start..end.max(start)
    }

    /// Split `range` into maximal runs whose samples are exactly one step
    /// apart. Missing hours end a run.
    pub fn contiguous_runs(&self, range: Range<usize>) -> Vec<Range<usize>> {
        let step = self.step();
        let mut runs = Vec::new();
        let mut run_start = range.start;
        for i in range.start + 1..range.end {
            if self.samples[i].instant - self.samples[i - 1].instant != step {
                runs.push(run_start..i);
                run_start = i;
            }
        }
        if run_start < range.end {
            runs.push(run_start..range.end);
        }
        runs
    }
}
