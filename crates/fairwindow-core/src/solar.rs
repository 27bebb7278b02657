//! Civil twilight (dawn/dusk) computation.
//!
//! Uses the spherical sunrise equation from the Almanac for Computers with a
//! 96° zenith, evaluated separately for the morning and evening events. The
//! result is an approximation good to a few minutes at mid latitudes.
//!
//! Near the poles the hour-angle cosine leaves `[-1, 1]`. It is clamped and
//! the window comes back flagged as degenerate instead of failing.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Zenith angle of the sun at civil dawn and dusk, in degrees.
pub const CIVIL_ZENITH_DEG: f64 = 96.0;

/// Dawn and dusk for one calendar day at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwilightWindow {
    pub dawn: DateTime<Utc>,
    pub dusk: DateTime<Utc>,
    /// True when the sun never crossed the twilight zenith and the hour
    /// angle had to be clamped (polar day or polar night).
    #[serde(default)]
    pub clamped: bool,
}

impl TwilightWindow {
    /// Build a window, collapsing an inverted pair to `dawn == dusk`.
    pub fn new(dawn: DateTime<Utc>, dusk: DateTime<Utc>, clamped: bool) -> Self {
        Self {
            dawn,
            dusk: dusk.max(dawn),
            clamped,
        }
    }

    /// Whether `instant` lies in `[dawn, dusk)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.dawn && instant < self.dusk
    }

    /// Length of usable daylight.
    pub fn span(&self) -> Duration {
        self.dusk - self.dawn
    }

    /// Polar day/night or a collapsed window.
    pub fn is_degenerate(&self) -> bool {
        self.clamped || self.dawn == self.dusk
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TwilightEvent {
    Dawn,
    Dusk,
}

impl TwilightEvent {
    /// Approximate local solar hour of the event, used to seed the series.
    fn seed_hour(self) -> f64 {
        match self {
            TwilightEvent::Dawn => 6.0,
            TwilightEvent::Dusk => 18.0,
        }
    }
}

/// Reject coordinates outside the physical range.
pub fn validate_location(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    let lat_ok = latitude.is_finite() && latitude.abs() <= 90.0;
    let lon_ok = longitude.is_finite() && longitude.abs() <= 180.0;
    if lat_ok && lon_ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidLocation {
            latitude,
            longitude,
        })
    }
}

/// Parse an IANA time zone identifier such as `America/Chicago`.
pub fn parse_time_zone(name: &str) -> Result<Tz, ValidationError> {
    name.parse::<Tz>()
        .map_err(|_| ValidationError::UnknownTimeZone(name.to_string()))
}

/// Civil twilight for the calendar day that `calendar_date` falls on in `tz`.
pub fn civil_twilight(
    latitude: f64,
    longitude: f64,
    tz: Tz,
    calendar_date: DateTime<Utc>,
) -> Result<TwilightWindow, ValidationError> {
    let local_date = calendar_date.with_timezone(&tz).date_naive();
    civil_twilight_on(latitude, longitude, local_date)
}

/// Civil twilight for a local calendar date.
pub fn civil_twilight_on(
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
) -> Result<TwilightWindow, ValidationError> {
    validate_location(latitude, longitude)?;

    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let day_of_year = (midnight + Duration::hours(12)).ordinal() as f64;

    let (dawn_hours, dawn_clamped) =
        event_utc_hours(day_of_year, latitude, longitude, TwilightEvent::Dawn);
    let (dusk_hours, dusk_clamped) =
        event_utc_hours(day_of_year, latitude, longitude, TwilightEvent::Dusk);

    let dawn = anchor_event(midnight, dawn_hours, longitude, TwilightEvent::Dawn);
    let dusk = anchor_event(midnight, dusk_hours, longitude, TwilightEvent::Dusk);

    Ok(TwilightWindow::new(dawn, dusk, dawn_clamped || dusk_clamped))
}

/// UTC hour-of-day of one event in `[0, 24)`, and whether cos H was clamped.
fn event_utc_hours(
    day_of_year: f64,
    latitude: f64,
    longitude: f64,
    event: TwilightEvent,
) -> (f64, bool) {
    let lng_hour = longitude / 15.0;
    let t = day_of_year + (event.seed_hour() - lng_hour) / 24.0;

    let mean_anomaly = 0.9856 * t - 3.289;
    let true_longitude = normalize_degrees(
        mean_anomaly
            + 1.916 * sin_deg(mean_anomaly)
            + 0.020 * sin_deg(2.0 * mean_anomaly)
            + 282.634,
    );

    let mut right_ascension = normalize_degrees(atan_deg(0.91764 * tan_deg(true_longitude)));
    let l_quadrant = (true_longitude / 90.0).floor() * 90.0;
    let ra_quadrant = (right_ascension / 90.0).floor() * 90.0;
    right_ascension = (right_ascension + l_quadrant - ra_quadrant) / 15.0;

    let sin_dec = 0.39782 * sin_deg(true_longitude);
    let cos_dec = sin_dec.asin().cos();

    let cos_h = (cos_deg(CIVIL_ZENITH_DEG) - sin_dec * sin_deg(latitude))
        / (cos_dec * cos_deg(latitude));
    let clamped = !(-1.0..=1.0).contains(&cos_h);
    let cos_h = cos_h.clamp(-1.0, 1.0);

    let hour_angle = match event {
        TwilightEvent::Dawn => 360.0 - acos_deg(cos_h),
        TwilightEvent::Dusk => acos_deg(cos_h),
    } / 15.0;

    let local_mean_time = hour_angle + right_ascension - 0.06571 * t - 6.622;
    ((local_mean_time - lng_hour).rem_euclid(24.0), clamped)
}

/// Place a UTC hour-of-day on the timeline of the local calendar day.
///
/// The series only yields an hour modulo 24. West of Greenwich the evening
/// event usually lands on the next UTC date, east of it the morning event
/// can land on the previous one, so the candidate closest to the event's
/// expected UTC hour wins.
fn anchor_event(
    midnight: DateTime<Utc>,
    utc_hours: f64,
    longitude: f64,
    event: TwilightEvent,
) -> DateTime<Utc> {
    let expected = event.seed_hour() - longitude / 15.0;
    let offset_days = [-1.0, 0.0, 1.0]
        .into_iter()
        .min_by(|a: &f64, b: &f64| {
            let da = (utc_hours + 24.0 * a - expected).abs();
            let db = (utc_hours + 24.0 * b - expected).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(0.0);

    let millis = ((utc_hours + 24.0 * offset_days) * 3_600_000.0).round() as i64;
    midnight + Duration::milliseconds(millis)
}

fn normalize_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

fn sin_deg(deg: f64) -> f64 {
    deg.to_radians().sin()
}

fn cos_deg(deg: f64) -> f64 {
    deg.to_radians().cos()
}

fn tan_deg(deg: f64) -> f64 {
    deg.to_radians().tan()
}

fn atan_deg(x: f64) -> f64 {
    x.atan().to_degrees()
}

fn acos_deg(x: f64) -> f64 {
    x.acos().to_degrees()
}
