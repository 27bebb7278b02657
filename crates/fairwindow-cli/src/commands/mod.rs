pub mod config;
pub mod recommend;
pub mod score;
pub mod twilight;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use fairwindow_core::Config;

/// Location resolved from flags, falling back to the config file.
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: String,
}

impl Location {
    pub fn resolve(
        config: &Config,
        lat: Option<f64>,
        lon: Option<f64>,
        tz: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let latitude = lat.or(config.location.latitude).ok_or(
            "no latitude: pass --lat or run `config set location.latitude <deg>`",
        )?;
        let longitude = lon.or(config.location.longitude).ok_or(
            "no longitude: pass --lon or run `config set location.longitude <deg>`",
        )?;
        let time_zone = tz
            .or_else(|| config.location.time_zone.clone())
            .unwrap_or_else(|| "UTC".to_string());
        Ok(Self {
            latitude,
            longitude,
            time_zone,
        })
    }

    pub fn tz(&self) -> Result<Tz, Box<dyn std::error::Error>> {
        Ok(fairwindow_core::solar::parse_time_zone(&self.time_zone)?)
    }
}

/// Local noon of `date` in `tz`, or now when no date is given.
pub fn reference_instant(tz: Tz, date: Option<NaiveDate>) -> DateTime<Utc> {
    let Some(date) = date else {
        return Utc::now();
    };
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    tz.from_local_datetime(&noon)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&noon))
}
