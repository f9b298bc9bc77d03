use crate::client::WeatherClient;
use crate::fallback::fallback_weather;
use crate::types::WeatherData;

/// Weather lookups that never fail for a well-formed ZIP.
///
/// Without a client (no API key configured) every answer comes from the
/// fallback data.
#[derive(Debug, Clone, Default)]
pub struct WeatherService {
    client: Option<WeatherClient>,
}

impl WeatherService {
    #[must_use]
    pub fn new(client: Option<WeatherClient>) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn offline() -> Self {
        Self { client: None }
    }

    /// Current conditions for a 5-digit ZIP.
    ///
    /// Returns `None` only when `zip` is not exactly five ASCII digits.
    pub async fn get_weather_data(&self, zip: &str) -> Option<WeatherData> {
        let zip = zip.trim();
        if !is_zip5(zip) {
            return None;
        }
        let Some(client) = &self.client else {
            return Some(fallback_weather(zip));
        };

        match client.current(zip).await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(error = %e, zip, "falling back to static weather");
                Some(fallback_weather(zip))
            }
        }
    }
}

fn is_zip5(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}
