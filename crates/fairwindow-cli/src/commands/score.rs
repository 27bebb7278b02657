//! Single-sample scoring command.

use chrono::Utc;
use clap::Args;

use fairwindow_core::{ComfortScorer, ConditionSample, Config};

#[derive(Args)]
pub struct ScoreArgs {
    /// Temperature in °F
    #[arg(long, allow_negative_numbers = true)]
    pub temp: Option<f64>,
    /// Wind speed in mph
    #[arg(long)]
    pub wind: Option<f64>,
    /// UV index
    #[arg(long)]
    pub uv: Option<f64>,
    /// US air quality index
    #[arg(long)]
    pub aqi: Option<f64>,
    /// Relative humidity in percent
    #[arg(long)]
    pub humidity: Option<f64>,
    /// Cloud cover in percent
    #[arg(long)]
    pub cloud: Option<f64>,
    /// Precipitation chance in percent
    #[arg(long)]
    pub precip: Option<f64>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ScoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    config.preferences.validate()?;

    let sample = ConditionSample {
        temperature_f: args.temp,
        wind_speed_mph: args.wind,
        uv_index: args.uv,
        aqi: args.aqi,
        humidity_pct: args.humidity,
        cloud_pct: args.cloud,
        precip_chance_pct: args.precip,
        ..ConditionSample::empty(Utc::now())
    };
    let breakdown = ComfortScorer::new(&config.preferences).breakdown(&sample);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    println!("Score: {}", breakdown.score);
    for term in &breakdown.terms {
        println!(
            "  {:<14} {:>7.1}  sub-score {:.2}",
            term.factor.as_str(),
            term.observed,
            term.sub_score
        );
    }
    if let Some(worst) = breakdown.limiting_factor() {
        println!("Limited by: {}", worst.factor);
    }
    Ok(())
}
