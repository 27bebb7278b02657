//! # Fairwindow Core Library
//!
//! Finds the most comfortable stretch of daylight for an outdoor activity.
//! The CLI is a thin layer over this crate; everything it does is available
//! here.
//!
//! ## Architecture
//!
//! - **Solar**: civil twilight (dawn/dusk) for a location and local date
//! - **Timeline**: hourly provider records expanded into fixed-step samples
//!   in engine units (°F, mph, percent)
//! - **Comfort**: weighted geometric-mean scoring against preference bands
//! - **Window**: linear-time search for the best daylight window
//! - **Providers**: Pirate Weather and Open-Meteo adapters plus an async
//!   fetch client
//! - **Storage**: TOML configuration
//!
//! ## Key Components
//!
//! - [`recommend`]: validate a request and produce a [`Recommendation`]
//! - [`ComfortScorer`]: per-sample comfort score
//! - [`WindowOptimizer`]: best-window search
//! - [`ForecastClient`]: fetch hourly records from the configured providers
//! - [`Config`]: application configuration management

pub mod comfort;
pub mod engine;
pub mod error;
pub mod providers;
pub mod solar;
pub mod storage;
pub mod timeline;
pub mod window;

pub use comfort::{ComfortBand, ComfortBreakdown, ComfortScorer, Factor, PreferenceSet};
pub use engine::{recommend, Outcome, Recommendation, RecommendationRequest, ScoredSample};
pub use error::{ConfigError, CoreError, ProviderError, Result, ValidationError};
pub use providers::{AirQualityProvider, ForecastClient, ProviderConfig, WeatherProvider};
pub use solar::{civil_twilight, civil_twilight_on, TwilightWindow};
pub use storage::Config;
pub use timeline::{
    build_timeline, AirQualityRecord, ConditionSample, HourlyRecord, Timeline, TimelineBuilder,
};
pub use window::{best_window, BestWindow, WindowOptimizer};
