//! End-to-end recommendation tests.
//!
//! Provider payloads recorded for Peoria, IL on 2025-08-18 go through the
//! adapters, the timeline builder, twilight, scoring and the window search.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fairwindow_core::providers::{
    AirQualityProvider, OpenMeteoAirQuality, PirateWeather, WeatherProvider,
};
use fairwindow_core::{recommend, Outcome, PreferenceSet, RecommendationRequest};
use serde_json::Value;

fn fixture(name: &str) -> Value {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn request() -> RecommendationRequest {
    RecommendationRequest::new(40.69, -89.59, "America/Chicago")
        .at(Utc.with_ymd_and_hms(2025, 8, 18, 14, 30, 0).unwrap())
}

#[test]
fn recorded_forecast_yields_the_cool_morning_window() {
    let hourly = PirateWeather::new().parse_hourly(&fixture("peoria_pirate_weather.json"));
    let air = OpenMeteoAirQuality::new().parse_hourly(&fixture("peoria_air_quality.json"));
    assert_eq!(hourly.len(), 30);
    assert_eq!(air.len(), 30);

    let rec = recommend(&request(), &hourly, &air).unwrap();

    assert_eq!(rec.outcome(), Outcome::Recommended);
    let best = rec.best.unwrap();
    assert_eq!(best.start, Utc.with_ymd_and_hms(2025, 8, 18, 12, 0, 0).unwrap());
    assert_eq!(best.end, best.start + Duration::minutes(60));
    assert_eq!(best.average_score, 100);

    // Records from the next UTC day are not part of the timeline.
    assert_eq!(rec.series.len(), 24 * 12);
    assert!(rec.series.iter().all(|s| s.instant.date_naive() == best.start.date_naive()));
}

#[test]
fn hours_before_dawn_are_never_chosen() {
    // Make the night the only comfortable time.
    let mut payload = fixture("peoria_pirate_weather.json");
    for hour in payload["hourly"]["data"].as_array_mut().unwrap() {
        let time = hour["time"].as_i64().unwrap();
        let hod = Utc.timestamp_opt(time, 0).unwrap().format("%H").to_string();
        hour["temperature"] = if hod.as_str() < "09" {
            serde_json::json!(18.0)
        } else {
            serde_json::json!(33.0)
        };
    }
    let hourly = PirateWeather::new().parse_hourly(&payload);

    let rec = recommend(&request(), &hourly, &[]).unwrap();
    let best = rec.best.unwrap();
    assert!(best.start >= rec.twilight.dawn);
    assert!(rec.twilight.contains(best.start));
    assert!(best.average_score < 100);
}

#[test]
fn air_quality_spike_is_avoided() {
    let hourly = PirateWeather::new().parse_hourly(&fixture("peoria_pirate_weather.json"));
    let air = OpenMeteoAirQuality::new().parse_hourly(&fixture("peoria_air_quality.json"));

    let rec = recommend(&request(), &hourly, &air).unwrap();
    let spike = Utc.with_ymd_and_hms(2025, 8, 18, 20, 0, 0).unwrap();
    let before = Utc.with_ymd_and_hms(2025, 8, 18, 19, 0, 0).unwrap();

    let score_at = |t: DateTime<Utc>| rec.series.iter().find(|s| s.instant == t).unwrap().score;
    assert!(score_at(spike) < score_at(before));
}

#[test]
fn stricter_preferences_lower_the_best_score() {
    let hourly = PirateWeather::new().parse_hourly(&fixture("peoria_pirate_weather.json"));
    let strict = PreferenceSet {
        temp_min: Some(50.0),
        temp_max: Some(58.0),
        ..Default::default()
    };

    let rec = recommend(&request().with_preferences(strict), &hourly, &[]).unwrap();
    let best = rec.best.unwrap();
    assert!(best.average_score < 100);
    assert_eq!(best.start, Utc.with_ymd_and_hms(2025, 8, 18, 12, 0, 0).unwrap());
}

#[test]
fn long_activity_uses_all_of_the_comfortable_block() {
    let hourly = PirateWeather::new().parse_hourly(&fixture("peoria_pirate_weather.json"));

    let rec = recommend(&request().with_duration(120).with_step(15), &hourly, &[]).unwrap();
    let best = rec.best.unwrap();
    assert_eq!(best.start, Utc.with_ymd_and_hms(2025, 8, 18, 12, 0, 0).unwrap());
    assert_eq!(best.duration_minutes, 120);
    assert_eq!(best.average_score, 100);
    assert_eq!(rec.series.len(), 24 * 4);
}

#[test]
fn garbage_payloads_degrade_to_no_recommendation() {
    let hourly = PirateWeather::new().parse_hourly(&serde_json::json!({"error": "quota"}));
    let air = OpenMeteoAirQuality::new().parse_hourly(&serde_json::json!([1, 2, 3]));

    let rec = recommend(&request(), &hourly, &air).unwrap();
    assert_eq!(rec.outcome(), Outcome::NoRecommendation);
}
