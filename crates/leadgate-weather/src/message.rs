use crate::types::WeatherCondition;

/// One-line promotional copy shown under the weather widget. Rain and
/// thunderstorms name the condition; drizzle falls through to the
/// temperature bands.
#[must_use]
pub fn weather_message(condition: WeatherCondition, temperature: i32) -> String {
    if matches!(
        condition,
        WeatherCondition::Rain | WeatherCondition::Thunderstorm
    ) {
        return format!(
            "With {condition} in your area, now's the perfect time to secure your home!"
        );
    }
    if temperature > 80 {
        format!("Enjoying the {temperature}°F weather? Keep your home secure while you're out!")
    } else if temperature < 50 {
        format!("Stay warm and secure this {temperature}°F weather with professional monitoring!")
    } else {
        format!("Beautiful {temperature}°F weather to secure your peace of mind!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rain_wins_over_temperature() {
        assert_eq!(
            weather_message(WeatherCondition::Rain, 95),
            "With rain in your area, now's the perfect time to secure your home!"
        );
    }

    #[test]
    fn thunderstorm_is_named_in_the_message() {
        assert_eq!(
            weather_message(WeatherCondition::Thunderstorm, 70),
            "With thunderstorm in your area, now's the perfect time to secure your home!"
        );
    }

    #[test]
    fn drizzle_uses_temperature_bands() {
        assert_eq!(
            weather_message(WeatherCondition::Drizzle, 45),
            "Stay warm and secure this 45°F weather with professional monitoring!"
        );
    }

    #[test]
    fn temperature_bands() {
        assert_eq!(
            weather_message(WeatherCondition::Clear, 81),
            "Enjoying the 81°F weather? Keep your home secure while you're out!"
        );
        assert_eq!(
            weather_message(WeatherCondition::Snow, 30),
            "Stay warm and secure this 30°F weather with professional monitoring!"
        );
        assert_eq!(
            weather_message(WeatherCondition::Clouds, 80),
            "Beautiful 80°F weather to secure your peace of mind!"
        );
        assert_eq!(
            weather_message(WeatherCondition::Clear, 50),
            "Beautiful 50°F weather to secure your peace of mind!"
        );
    }
}
