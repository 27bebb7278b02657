//! Weighted geometric-mean comfort scoring.

use serde::{Deserialize, Serialize};

use super::preferences::{ComfortBand, Factor, PreferenceSet};
use crate::timeline::ConditionSample;

/// Floor applied to sub-scores before taking the logarithm.
const SUB_SCORE_EPSILON: f64 = 1e-6;

/// Contribution of one factor to a score, for explanations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTerm {
    pub factor: Factor,
    /// Fixed weight of the factor
    pub weight: f64,
    /// Observed value in engine units
    pub observed: f64,
    /// Sub-score in (0, 1]
    pub sub_score: f64,
}

/// Per-factor breakdown of one sample's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComfortBreakdown {
    /// Terms for the factors present in the sample
    pub terms: Vec<FactorTerm>,
    /// Final score 0-100
    pub score: u8,
}

impl ComfortBreakdown {
    /// The factor that pulls the score down the most.
    pub fn limiting_factor(&self) -> Option<&FactorTerm> {
        self.terms
            .iter()
            .filter(|t| t.sub_score < 1.0)
            .min_by(|a, b| {
                let la = a.weight * a.sub_score.max(SUB_SCORE_EPSILON).ln();
                let lb = b.weight * b.sub_score.max(SUB_SCORE_EPSILON).ln();
                la.total_cmp(&lb)
            })
    }
}

/// Scores samples against one resolved preference set.
///
/// Absent factors are left out of the mean and the remaining weights are
/// renormalized, so a missing reading neither helps nor hurts. A sample with
/// no readings at all scores 100.
#[derive(Debug, Clone)]
pub struct ComfortScorer {
    bands: [ComfortBand; 7],
}

impl ComfortScorer {
    pub fn new(prefs: &PreferenceSet) -> Self {
        Self {
            bands: Factor::ALL.map(|f| prefs.band(f)),
        }
    }

    pub fn band(&self, factor: Factor) -> ComfortBand {
        self.bands[Self::index(factor)]
    }

    /// Comfort score in `[0, 100]`.
    pub fn score(&self, sample: &ConditionSample) -> u8 {
        let mut weight_sum = 0.0;
        let mut log_sum = 0.0;
        for factor in Factor::ALL {
            if let Some(sub) = self.sub_score(factor, sample) {
                weight_sum += factor.weight();
                log_sum += factor.weight() * sub.max(SUB_SCORE_EPSILON).ln();
            }
        }
        to_score(weight_sum, log_sum)
    }

    /// Score plus the per-factor terms behind it.
    pub fn breakdown(&self, sample: &ConditionSample) -> ComfortBreakdown {
        let terms: Vec<FactorTerm> = Factor::ALL
            .into_iter()
            .filter_map(|factor| {
                let observed = factor.read(sample).filter(|v| v.is_finite())?;
                Some(FactorTerm {
                    factor,
                    weight: factor.weight(),
                    observed,
                    sub_score: self.band(factor).sub_score(observed, factor.decay()),
                })
            })
            .collect();

        let weight_sum = terms.iter().map(|t| t.weight).sum();
        let log_sum = terms
            .iter()
            .map(|t| t.weight * t.sub_score.max(SUB_SCORE_EPSILON).ln())
            .sum();

        ComfortBreakdown {
            score: to_score(weight_sum, log_sum),
            terms,
        }
    }

    fn sub_score(&self, factor: Factor, sample: &ConditionSample) -> Option<f64> {
        let observed = factor.read(sample).filter(|v| v.is_finite())?;
        Some(self.band(factor).sub_score(observed, factor.decay()))
    }

    fn index(factor: Factor) -> usize {
        match factor {
            Factor::Temperature => 0,
            Factor::Wind => 1,
            Factor::Uv => 2,
            Factor::Aqi => 3,
            Factor::Humidity => 4,
            Factor::Cloud => 5,
            Factor::Precipitation => 6,
        }
    }
}

/// Score one sample against `prefs`.
pub fn score(sample: &ConditionSample, prefs: &PreferenceSet) -> u8 {
    ComfortScorer::new(prefs).score(sample)
}

fn to_score(weight_sum: f64, log_sum: f64) -> u8 {
    if weight_sum <= 0.0 {
        return 100;
    }
    let mean = (log_sum / weight_sum).exp();
    (mean * 100.0).round().clamp(0.0, 100.0) as u8
}
