//! Current-conditions lookup for the brand page weather widget.
//!
//! [`WeatherService`] calls OpenWeather through [`WeatherClient`] and falls
//! back to static or synthetic data, so the widget always has something to
//! show. Every record says where it came from via [`WeatherSource`].

pub mod client;
pub mod error;
pub mod fallback;
pub mod message;
pub mod service;
pub mod types;

pub use client::WeatherClient;
pub use error::WeatherError;
pub use message::weather_message;
pub use service::WeatherService;
pub use types::{WeatherCondition, WeatherData, WeatherSource};
