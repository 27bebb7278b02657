//! Async HTTP client for the configured forecast providers.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::{AirQualityProvider, ProviderConfig, WeatherProvider};
use crate::error::ProviderError;
use crate::timeline::{AirQualityRecord, HourlyRecord};

/// Fetches and parses hourly forecasts.
pub struct ForecastClient {
    http_client: Client,
    weather: Box<dyn WeatherProvider>,
    air_quality: Option<Box<dyn AirQualityProvider>>,
    api_key: Option<String>,
}

impl ForecastClient {
    /// Build a client from provider settings.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .user_agent(concat!("fairwindow/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            weather: config.weather_provider()?,
            air_quality: config.air_quality_provider()?,
            api_key: config.resolve_api_key(),
        })
    }

    pub fn weather_provider(&self) -> &dyn WeatherProvider {
        self.weather.as_ref()
    }

    /// Hourly weather records for a location.
    pub async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<HourlyRecord>, ProviderError> {
        let provider = self.weather.as_ref();
        if provider.requires_api_key() && self.api_key.is_none() {
            return Err(ProviderError::MissingApiKey(provider.name().to_string()));
        }

        let url = provider.forecast_url(latitude, longitude, self.api_key.as_deref())?;
        let payload = self.get_json(provider.name(), url).await?;
        let records = provider.parse_hourly(&payload);
        tracing::debug!(
            provider = provider.name(),
            records = records.len(),
            "Fetched hourly weather"
        );
        Ok(records)
    }

    /// Hourly AQI records, empty when air quality is disabled.
    pub async fn fetch_air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<AirQualityRecord>, ProviderError> {
        let Some(provider) = self.air_quality.as_deref() else {
            return Ok(Vec::new());
        };

        let url = provider.air_quality_url(latitude, longitude)?;
        let payload = self.get_json(provider.name(), url).await?;
        let records = provider.parse_hourly(&payload);
        tracing::debug!(
            provider = provider.name(),
            records = records.len(),
            "Fetched hourly air quality"
        );
        Ok(records)
    }

    /// GET a JSON document. A body that is not JSON parses as `null`, which
    /// the adapters turn into an empty record list.
    async fn get_json(&self, provider: &str, url: Url) -> Result<Value, ProviderError> {
        let resp = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(redact_url)?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(provider, status = status.as_u16(), "Provider request failed");
            return Err(ProviderError::Status {
                provider: provider.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(redact_url)?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            tracing::warn!(provider, error = %e, "Provider returned malformed JSON");
            Value::Null
        }))
    }
}

/// Drop the request URL from a transport error; some providers carry the
/// API key in the path.
fn redact_url(err: reqwest::Error) -> ProviderError {
    ProviderError::Http(err.without_url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn open_meteo_config(server: &mockito::ServerGuard) -> ProviderConfig {
        ProviderConfig {
            weather: "open_meteo".to_string(),
            air_quality: "open_meteo".to_string(),
            weather_base_url: Some(server.url()),
            air_quality_base_url: Some(server.url()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn fetches_open_meteo_forecast() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("latitude".into(), "40.69".into()),
                Matcher::UrlEncoded("longitude".into(), "-89.59".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "hourly_units": {"temperature_2m": "°C", "wind_speed_10m": "m/s"},
                    "hourly": {
                        "time": ["2025-08-18T10:00", "2025-08-18T11:00"],
                        "temperature_2m": [18.0, 19.5],
                        "wind_speed_10m": [1.0, 2.0]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ForecastClient::new(&open_meteo_config(&server)).unwrap();
        let records = client.fetch_weather(40.69, -89.59).await.unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert!((records[1].temperature.unwrap().fahrenheit() - 67.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn fetches_air_quality() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/air-quality")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"hourly":{"time":["2025-08-18T10:00"],"us_aqi":[35]}}"#)
            .create_async()
            .await;

        let client = ForecastClient::new(&open_meteo_config(&server)).unwrap();
        let records = client.fetch_air_quality(40.69, -89.59).await.unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].aqi, Some(35.0));
    }

    #[tokio::test]
    async fn disabled_air_quality_makes_no_request() {
        let server = mockito::Server::new_async().await;
        let config = ProviderConfig {
            air_quality: "none".to_string(),
            ..open_meteo_config(&server)
        };
        let client = ForecastClient::new(&config).unwrap();
        assert!(client.fetch_air_quality(0.0, 0.0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pirate_weather_uses_key_in_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/forecast/test-key/40.69,-89.59")
            .match_query(Matcher::UrlEncoded("units".into(), "si".into()))
            .with_status(200)
            .with_body(r#"{"hourly":{"data":[{"time":1755511200,"temperature":20.0}]}}"#)
            .create_async()
            .await;

        let config = ProviderConfig {
            weather: "pirate_weather".to_string(),
            weather_base_url: Some(server.url()),
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let client = ForecastClient::new(&config).unwrap();
        let records = client.fetch_weather(40.69, -89.59).await.unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = ProviderConfig {
            weather: "pirate_weather".to_string(),
            api_key_env: "FAIRWINDOW_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        let client = ForecastClient::new(&config).unwrap();
        let err = client.fetch_weather(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey(_)));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = ForecastClient::new(&open_meteo_config(&server)).unwrap();
        let err = client.fetch_weather(1.0, 2.0).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn transport_errors_do_not_expose_the_api_key() {
        // Nothing listens on the discard port.
        let config = ProviderConfig {
            weather: "pirate_weather".to_string(),
            weather_base_url: Some("http://127.0.0.1:9".to_string()),
            api_key: Some("SUPERSECRETKEY".to_string()),
            timeout_seconds: 2,
            ..Default::default()
        };
        let client = ForecastClient::new(&config).unwrap();
        let err = client.fetch_weather(1.0, 2.0).await.unwrap_err();

        assert!(matches!(err, ProviderError::Http(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
        assert!(!crate::error::CoreError::from(err).to_string().contains("SUPERSECRETKEY"));
    }

    #[tokio::test]
    async fn malformed_body_degrades_to_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = ForecastClient::new(&open_meteo_config(&server)).unwrap();
        assert!(client.fetch_weather(1.0, 2.0).await.unwrap().is_empty());
    }
}
