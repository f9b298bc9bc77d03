use thiserror::Error;

/// Errors returned by the OpenWeather client.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from weather API")]
    UpstreamStatus { status: u16 },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed but carried no condition entry.
    #[error("weather response for {zip} has no conditions")]
    MissingConditions { zip: String },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
