//! Comfort scoring.
//!
//! Maps one condition sample and a preference set to a 0-100 score: a
//! weighted geometric mean of per-factor sub-scores, each of which decays
//! exponentially outside the preferred range.

mod preferences;
mod scorer;

pub use preferences::{ComfortBand, Factor, PreferenceSet};
pub use scorer::{score, ComfortBreakdown, ComfortScorer, FactorTerm};
