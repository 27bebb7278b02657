//! Civil twilight command.

use chrono::NaiveDate;
use clap::Args;

use fairwindow_core::{civil_twilight, Config};

use super::{reference_instant, Location};

#[derive(Args)]
pub struct TwilightArgs {
    /// Latitude in degrees (defaults to location.latitude)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Longitude in degrees (defaults to location.longitude)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,
    /// IANA time zone (defaults to location.time_zone, then UTC)
    #[arg(long)]
    pub tz: Option<String>,
    /// Local date (YYYY-MM-DD), default today
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: TwilightArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let location = Location::resolve(&config, args.lat, args.lon, args.tz)?;
    let tz = location.tz()?;

    let at = reference_instant(tz, args.date);
    let window = civil_twilight(location.latitude, location.longitude, tz, at)?;

    if args.json {
        let json = serde_json::json!({
            "date": at.with_timezone(&tz).date_naive().to_string(),
            "time_zone": location.time_zone,
            "dawn": window.dawn,
            "dusk": window.dusk,
            "dawn_local": window.dawn.with_timezone(&tz).to_rfc3339(),
            "dusk_local": window.dusk.with_timezone(&tz).to_rfc3339(),
            "daylight_minutes": window.span().num_minutes(),
            "clamped": window.clamped,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("Date:     {}", at.with_timezone(&tz).format("%Y-%m-%d"));
    println!("Dawn:     {}", window.dawn.with_timezone(&tz).format("%H:%M %Z"));
    println!("Dusk:     {}", window.dusk.with_timezone(&tz).format("%H:%M %Z"));
    let span = window.span();
    println!(
        "Daylight: {}h {:02}m",
        span.num_hours(),
        span.num_minutes() % 60
    );
    if window.is_degenerate() {
        println!("Note: polar day or night; the sun does not cross civil twilight.");
    }
    Ok(())
}
