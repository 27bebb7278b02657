//! Best contiguous window search.
//!
//! Scores every daylight sample once, builds prefix sums and slides a
//! fixed-length window across them in linear time. A window never spans a
//! gap in the timeline. Ties go to the earliest start.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::comfort::{ComfortScorer, PreferenceSet};
use crate::solar::TwilightWindow;
use crate::timeline::Timeline;

/// Result of one optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Rounded mean comfort score over the window
    pub average_score: u8,
    pub duration_minutes: i64,
    /// True when daylight was shorter than the requested duration
    pub shortened: bool,
}

impl BestWindow {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Start index and mean of the best run of `need` consecutive scores.
///
/// Returns `None` when `need` is zero or longer than `scores`.
pub fn best_run(scores: &[u8], need: usize) -> Option<(usize, f64)> {
    if need == 0 || need > scores.len() {
        return None;
    }

    let mut prefix = Vec::with_capacity(scores.len() + 1);
    prefix.push(0u64);
    for &s in scores {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + s as u64);
    }

    let mut best_start = 0;
    let mut best_sum = prefix[need];
    for start in 1..=scores.len() - need {
        let sum = prefix[start + need] - prefix[start];
        if sum > best_sum {
            best_sum = sum;
            best_start = start;
        }
    }

    Some((best_start, best_sum as f64 / need as f64))
}

/// Finds the most comfortable daylight window of a given length.
#[derive(Debug, Clone)]
pub struct WindowOptimizer {
    scorer: ComfortScorer,
}

impl WindowOptimizer {
    pub fn new(prefs: &PreferenceSet) -> Self {
        Self {
            scorer: ComfortScorer::new(prefs),
        }
    }

    pub fn with_scorer(scorer: ComfortScorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &ComfortScorer {
        &self.scorer
    }

    /// Score the timeline and search it.
    pub fn best_window(
        &self,
        timeline: &Timeline,
        daylight: &TwilightWindow,
        duration_minutes: i64,
    ) -> Option<BestWindow> {
        let scores: Vec<u8> = timeline.iter().map(|s| self.scorer.score(s)).collect();
        Self::best_window_scored(timeline, &scores, daylight, duration_minutes)
    }

    /// Search with scores already computed, one per timeline sample.
    pub fn best_window_scored(
        timeline: &Timeline,
        scores: &[u8],
        daylight: &TwilightWindow,
        duration_minutes: i64,
    ) -> Option<BestWindow> {
        if duration_minutes <= 0 || scores.len() != timeline.len() {
            return None;
        }

        let runs = timeline.contiguous_runs(timeline.daylight_range(daylight));
        let longest = runs.iter().map(|r| r.len()).max().unwrap_or(0);
        if longest == 0 {
            return None;
        }

        let step = timeline.step_minutes().max(1) as i64;
        let requested = ((duration_minutes as f64 / step as f64).round() as usize).max(1);
        let (need, duration_minutes, shortened) = if requested > longest {
            (longest, longest as i64 * step, true)
        } else {
            (requested, duration_minutes, false)
        };

        // Runs are in time order, so strict `>` keeps the earliest start.
        let mut best: Option<(usize, f64)> = None;
        for run in runs {
            let offset = run.start;
            if let Some((idx, average)) = best_run(&scores[run], need) {
                if best.map_or(true, |(_, top)| average > top) {
                    best = Some((offset + idx, average));
                }
            }
        }
        let (start_idx, average) = best?;
        let start = timeline.samples()[start_idx].instant;

        Some(BestWindow {
            start,
            end: start + Duration::minutes(duration_minutes),
            average_score: average.round().clamp(0.0, 100.0) as u8,
            duration_minutes,
            shortened,
        })
    }
}

/// Best daylight window for `prefs`, or `None` when there is nothing to rank.
pub fn best_window(
    timeline: &Timeline,
    daylight: &TwilightWindow,
    duration_minutes: i64,
    prefs: &PreferenceSet,
) -> Option<BestWindow> {
    WindowOptimizer::new(prefs).best_window(timeline, daylight, duration_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::ConditionSample;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 18, h, m, 0).unwrap()
    }

    fn whole_day() -> TwilightWindow {
        TwilightWindow::new(at(0, 0), at(0, 0) + Duration::days(1), false)
    }

    /// Hourly-step timeline where hour `h` has temperature `temps[h]`.
    fn timeline_with_temps(step: u32, temps: &[f64]) -> Timeline {
        let samples = temps
            .iter()
            .enumerate()
            .map(|(i, t)| ConditionSample {
                temperature_f: Some(*t),
                ..ConditionSample::empty(at(0, 0) + Duration::minutes(i as i64 * step as i64))
            })
            .collect();
        Timeline::new(step, samples)
    }

    #[test]
    fn best_run_finds_the_high_block() {
        let mut scores = vec![10u8; 100];
        scores[50..53].copy_from_slice(&[90, 90, 90]);
        assert_eq!(best_run(&scores, 3), Some((50, 90.0)));
    }

    #[test]
    fn best_run_prefers_earliest_tie() {
        let scores = vec![70u8; 40];
        assert_eq!(best_run(&scores, 5), Some((0, 70.0)));

        let scores = [50, 80, 80, 50, 80, 80, 50];
        assert_eq!(best_run(&scores, 2), Some((1, 80.0)));
    }

    #[test]
    fn best_run_rejects_impossible_lengths() {
        assert_eq!(best_run(&[1, 2, 3], 0), None);
        assert_eq!(best_run(&[1, 2, 3], 4), None);
        assert_eq!(best_run(&[], 1), None);
        assert_eq!(best_run(&[7], 1), Some((0, 7.0)));
    }

    #[test]
    fn finds_the_comfortable_run_in_a_hot_day() {
        let mut temps = vec![95.0; 100];
        temps[50..53].copy_from_slice(&[60.0, 60.0, 60.0]);
        let timeline = timeline_with_temps(5, &temps);

        let best = best_window(&timeline, &whole_day(), 15, &PreferenceSet::default()).unwrap();
        assert_eq!(best.start, timeline.samples()[50].instant);
        assert_eq!(best.end - best.start, Duration::minutes(15));
        assert_eq!(best.average_score, 100);
        assert!(!best.shortened);
    }

    #[test]
    fn end_follows_requested_duration_not_sample_count() {
        let timeline = timeline_with_temps(5, &[60.0; 30]);
        // 7 minutes rounds to one sample, but the window still spans 7 minutes.
        let best = best_window(&timeline, &whole_day(), 7, &PreferenceSet::default()).unwrap();
        assert_eq!(best.duration(), Duration::minutes(7));
        assert_eq!(best.start, at(0, 0));
    }

    #[test]
    fn samples_outside_daylight_are_ignored() {
        // Comfortable before dawn, hot after.
        let mut temps = vec![95.0; 24];
        temps[2..5].copy_from_slice(&[60.0, 60.0, 60.0]);
        temps[12] = 80.0;
        let timeline = timeline_with_temps(60, &temps);
        let daylight = TwilightWindow::new(at(6, 0), at(20, 0), false);

        let best = best_window(&timeline, &daylight, 60, &PreferenceSet::default()).unwrap();
        assert_eq!(best.start, at(12, 0));
    }

    #[test]
    fn short_daylight_shrinks_the_window() {
        let timeline = timeline_with_temps(10, &[60.0; 144]);
        let daylight = TwilightWindow::new(at(12, 0), at(12, 30), false);

        let best = best_window(&timeline, &daylight, 120, &PreferenceSet::default()).unwrap();
        assert!(best.shortened);
        assert_eq!(best.start, at(12, 0));
        assert_eq!(best.duration_minutes, 30);
        assert_eq!(best.duration(), daylight.span());
    }

    fn hourly_at(hours_and_temps: &[(u32, f64)]) -> Timeline {
        let samples = hours_and_temps
            .iter()
            .map(|&(h, t)| ConditionSample {
                temperature_f: Some(t),
                ..ConditionSample::empty(at(h, 0))
            })
            .collect();
        Timeline::new(60, samples)
    }

    #[test]
    fn window_never_spans_missing_hours() {
        // Only 10:00 and 13:00 are comfortable, with 11:00-12:00 missing.
        let timeline = hourly_at(&[(9, 95.0), (10, 60.0), (13, 60.0), (14, 95.0)]);

        let best = best_window(&timeline, &whole_day(), 120, &PreferenceSet::default()).unwrap();
        assert_eq!(best.start, at(9, 0));
        assert!(best.average_score < 100);
        assert!(!best.shortened);
    }

    #[test]
    fn isolated_hours_shrink_to_the_longest_gap_free_run() {
        let timeline = hourly_at(&[(15, 60.0), (20, 60.0)]);

        let best = best_window(&timeline, &whole_day(), 120, &PreferenceSet::default()).unwrap();
        assert_eq!(best.start, at(15, 0));
        assert_eq!(best.end, at(16, 0));
        assert_eq!(best.duration_minutes, 60);
        assert!(best.shortened);
    }

    #[test]
    fn later_run_wins_when_it_scores_higher() {
        let timeline = hourly_at(&[(8, 80.0), (9, 80.0), (12, 62.0), (13, 62.0), (14, 62.0)]);

        let best = best_window(&timeline, &whole_day(), 120, &PreferenceSet::default()).unwrap();
        assert_eq!(best.start, at(12, 0));
        assert_eq!(best.average_score, 100);
    }

    #[test]
    fn no_daylight_or_empty_timeline_gives_none() {
        let prefs = PreferenceSet::default();
        let empty = Timeline::empty(5);
        assert!(best_window(&empty, &whole_day(), 30, &prefs).is_none());

        let timeline = timeline_with_temps(60, &[60.0; 6]);
        let evening = TwilightWindow::new(at(18, 0), at(21, 0), false);
        assert!(best_window(&timeline, &evening, 30, &prefs).is_none());

        let collapsed = TwilightWindow::new(at(3, 0), at(3, 0), true);
        assert!(best_window(&timeline, &collapsed, 30, &prefs).is_none());
    }

    #[test]
    fn non_positive_duration_gives_none() {
        let timeline = timeline_with_temps(5, &[60.0; 12]);
        assert!(best_window(&timeline, &whole_day(), 0, &PreferenceSet::default()).is_none());
        assert!(best_window(&timeline, &whole_day(), -5, &PreferenceSet::default()).is_none());
    }

    #[test]
    fn precomputed_scores_must_match_timeline_length() {
        let timeline = timeline_with_temps(5, &[60.0; 12]);
        assert!(WindowOptimizer::best_window_scored(&timeline, &[100; 3], &whole_day(), 10).is_none());
    }
}
