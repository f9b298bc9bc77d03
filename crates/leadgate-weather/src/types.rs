use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    Other,
}

impl WeatherCondition {
    /// Maps OpenWeather's `weather[].main` group onto the widget's tags.
    #[must_use]
    pub fn from_group(group: &str) -> Self {
        match group.trim().to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "drizzle" => Self::Drizzle,
            "rain" => Self::Rain,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Drizzle => "drizzle",
            Self::Rain => "rain",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a [`WeatherData`] record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    /// Returned by the upstream weather service.
    Live,
    /// Static per-ZIP record.
    Fallback,
    /// Randomized placeholder for a ZIP with no static record. Not real data.
    Synthetic,
}

impl WeatherSource {
    #[must_use]
    pub fn is_authoritative(self) -> bool {
        self == Self::Live
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
    /// Degrees Fahrenheit, rounded.
    pub temperature: i32,
    pub condition: WeatherCondition,
    pub description: String,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Miles per hour, rounded.
    pub wind_speed: i32,
    pub location: String,
    pub icon: String,
    pub source: WeatherSource,
}

// ---------------------------------------------------------------------------
// OpenWeather wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeatherResponse {
    pub name: String,
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<ConditionBlock>,
    pub wind: WindBlock,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainBlock {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionBlock {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WindBlock {
    pub speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_groups_map_to_tags() {
        assert_eq!(WeatherCondition::from_group("Clear"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_group("Clouds"), WeatherCondition::Clouds);
        assert_eq!(WeatherCondition::from_group("Drizzle"), WeatherCondition::Drizzle);
        assert_eq!(
            WeatherCondition::from_group("Thunderstorm"),
            WeatherCondition::Thunderstorm
        );
        assert_eq!(WeatherCondition::from_group(" RAIN "), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_group("Snow"), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_group("Haze"), WeatherCondition::Other);
    }

    #[test]
    fn weather_data_serializes_camel_case_lowercase_tags() {
        let data = WeatherData {
            temperature: 72,
            condition: WeatherCondition::Clouds,
            description: "partly cloudy".to_string(),
            humidity: 60,
            wind_speed: 10,
            location: "Charlotte, NC".to_string(),
            icon: "02d".to_string(),
            source: WeatherSource::Fallback,
        };
        let json = serde_json::to_value(&data).expect("serialize");
        assert_eq!(json["windSpeed"], 10);
        assert_eq!(json["condition"], "clouds");
        assert_eq!(json["source"], "fallback");
    }

    #[test]
    fn only_live_data_is_authoritative() {
        assert!(WeatherSource::Live.is_authoritative());
        assert!(!WeatherSource::Fallback.is_authoritative());
        assert!(!WeatherSource::Synthetic.is_authoritative());
    }
}
