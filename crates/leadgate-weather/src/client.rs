//! HTTP client for the OpenWeather current-weather endpoint.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::WeatherError;
use crate::types::{CurrentWeatherResponse, WeatherCondition, WeatherData, WeatherSource};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/";

/// Client for OpenWeather's `weather` endpoint, imperial units, US ZIPs.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl WeatherClient {
    /// # Errors
    ///
    /// Returns [`WeatherError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`WeatherError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| WeatherError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    /// Fetches current conditions for a US ZIP code.
    ///
    /// # Errors
    ///
    /// - [`WeatherError::UpstreamStatus`] on a non-2xx response.
    /// - [`WeatherError::Http`] on network failure.
    /// - [`WeatherError::Deserialize`] if the body has an unexpected shape.
    /// - [`WeatherError::MissingConditions`] if `weather` is empty.
    pub async fn current(&self, zip: &str) -> Result<WeatherData, WeatherError> {
        let url = self.build_url(zip)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: CurrentWeatherResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Deserialize {
                context: format!("weather(zip={zip})"),
                source: e,
            })?;

        into_weather_data(parsed, zip)
    }

    fn build_url(&self, zip: &str) -> Result<Url, WeatherError> {
        let mut url = self
            .base_url
            .join("weather")
            .map_err(|e| WeatherError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("zip", &format!("{zip},US"))
            .append_pair("appid", &self.api_key)
            .append_pair("units", "imperial");
        Ok(url)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn into_weather_data(parsed: CurrentWeatherResponse, zip: &str) -> Result<WeatherData, WeatherError> {
    let conditions = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MissingConditions {
            zip: zip.to_string(),
        })?;

    Ok(WeatherData {
        temperature: parsed.main.temp.round() as i32,
        condition: WeatherCondition::from_group(&conditions.main),
        description: conditions.description,
        humidity: parsed.main.humidity.round().clamp(0.0, 100.0) as u8,
        wind_speed: parsed.wind.speed.round() as i32,
        location: parsed.name,
        icon: conditions.icon,
        source: WeatherSource::Live,
    })
}
