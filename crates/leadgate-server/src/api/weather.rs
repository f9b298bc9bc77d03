use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use leadgate_weather::{weather_message, WeatherData};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};

/// Used when the widget asks without a ZIP (downtown Raleigh).
const DEFAULT_WEATHER_ZIP: &str = "27601";

#[derive(Debug, Deserialize)]
pub(super) struct WeatherParams {
    zip: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct WeatherResponse {
    #[serde(flatten)]
    data: WeatherData,
    message: String,
    timestamp: DateTime<Utc>,
}

pub(super) async fn current_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let zip = params
        .zip
        .filter(|z| !z.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_WEATHER_ZIP.to_string());

    let data = state
        .weather
        .get_weather_data(&zip)
        .await
        .ok_or_else(|| ApiError::not_found("Weather data not available"))?;

    Ok(Json(WeatherResponse {
        message: weather_message(data.condition, data.temperature),
        data,
        timestamp: Utc::now(),
    }))
}
