//! Best-window recommendation command.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use fairwindow_core::providers::{AirQualityProvider, OpenMeteoAirQuality};
use fairwindow_core::{
    recommend, AirQualityRecord, Config, ForecastClient, HourlyRecord, Outcome,
    RecommendationRequest,
};

use super::{reference_instant, Location};

#[derive(Args)]
pub struct RecommendArgs {
    /// Latitude in degrees (defaults to location.latitude)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Longitude in degrees (defaults to location.longitude)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,
    /// IANA time zone (defaults to location.time_zone, then UTC)
    #[arg(long)]
    pub tz: Option<String>,
    /// Activity length in minutes
    #[arg(long, allow_negative_numbers = true)]
    pub duration: Option<i64>,
    /// Timeline resolution in minutes (a divisor of 60)
    #[arg(long)]
    pub step: Option<u32>,
    /// Local date to plan for (YYYY-MM-DD), default today
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Read the weather forecast from a JSON file instead of fetching it
    #[arg(long)]
    pub weather: Option<PathBuf>,
    /// Read air quality from a JSON file (only with --weather)
    #[arg(long, requires = "weather")]
    pub air: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
    /// Print an hourly score chart
    #[arg(long)]
    pub chart: bool,
}

pub fn run(args: RecommendArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let location = Location::resolve(&config, args.lat, args.lon, args.tz)?;
    let tz = location.tz()?;

    let request = RecommendationRequest {
        latitude: location.latitude,
        longitude: location.longitude,
        time_zone: location.time_zone.clone(),
        duration_minutes: args.duration.unwrap_or(config.activity.duration_minutes),
        step_minutes: args.step.unwrap_or(config.activity.step_minutes),
        preferences: config.preferences,
        now: reference_instant(tz, args.date),
    };
    // Fail on bad input before touching the network.
    request.validate()?;

    let (hourly, air_quality) = match &args.weather {
        Some(path) => read_records(&config, path, args.air.as_deref())?,
        None => fetch_records(&config, &location)?,
    };

    let rec = recommend(&request, &hourly, &air_quality)?;

    if args.json {
        let json = serde_json::json!({
            "outcome": rec.outcome().as_str(),
            "time_zone": location.time_zone,
            "twilight": rec.twilight,
            "best": rec.best,
            "series": rec.series,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let fmt = "%Y-%m-%d %H:%M %Z";
    println!(
        "Civil twilight: {} - {}",
        rec.twilight.dawn.with_timezone(&tz).format(fmt),
        rec.twilight.dusk.with_timezone(&tz).format("%H:%M %Z")
    );
    if rec.twilight.clamped {
        println!("  (sun does not cross civil twilight today)");
    }

    match (rec.outcome(), rec.best) {
        (Outcome::Recommended, Some(best)) => {
            println!(
                "Best window:    {} - {} (score {})",
                best.start.with_timezone(&tz).format(fmt),
                best.end.with_timezone(&tz).format("%H:%M"),
                best.average_score
            );
            if best.shortened {
                println!(
                    "  Daylight only allows {} minutes; window shortened.",
                    best.duration_minutes
                );
            }
        }
        _ => println!("No recommendation: no forecast data inside daylight."),
    }

    if args.chart {
        println!();
        print!("{}", rec.render_ascii_chart(tz));
    }

    Ok(())
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)
        .map_err(|e| format!("{} is not valid JSON: {e}", path.display()))?)
}

fn read_records(
    config: &Config,
    weather: &Path,
    air: Option<&Path>,
) -> Result<(Vec<HourlyRecord>, Vec<AirQualityRecord>), Box<dyn std::error::Error>> {
    let provider = config.provider.weather_provider()?;
    let hourly = provider.parse_hourly(&read_json(weather)?);

    let air_quality = match air {
        Some(path) => {
            let payload = read_json(path)?;
            match config.provider.air_quality_provider()? {
                Some(provider) => provider.parse_hourly(&payload),
                None => OpenMeteoAirQuality::new().parse_hourly(&payload),
            }
        }
        None => Vec::new(),
    };

    Ok((hourly, air_quality))
}

fn fetch_records(
    config: &Config,
    location: &Location,
) -> Result<(Vec<HourlyRecord>, Vec<AirQualityRecord>), Box<dyn std::error::Error>> {
    let client = ForecastClient::new(&config.provider)?;
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let (weather, air_quality) = tokio::join!(
            client.fetch_weather(location.latitude, location.longitude),
            client.fetch_air_quality(location.latitude, location.longitude),
        );
        let hourly = weather?;
        // Air quality is optional; a failed fetch only drops the factor.
        let air_quality = air_quality.unwrap_or_else(|e| {
            tracing::warn!("Air quality unavailable: {}", e);
            Vec::new()
        });
        Ok::<_, Box<dyn std::error::Error>>((hourly, air_quality))
    })
}
