use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use leadgate_places::{PlaceDetails, PlacesClient, PlacesError};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AutocompleteParams {
    input: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DetailsParams {
    place_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SuggestionItem {
    description: String,
    place_id: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AutocompleteResponse {
    suggestions: Vec<SuggestionItem>,
}

fn configured_client(state: &AppState) -> Result<&PlacesClient, ApiError> {
    state.places.as_ref().ok_or_else(|| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Google Places API key not configured",
        )
    })
}

/// Maps an upstream failure onto the proxy's response. Non-2xx statuses are
/// passed through; anything else is a 500 with `fallback_message`.
fn upstream_error(error: &PlacesError, fallback_message: &'static str) -> ApiError {
    match error {
        PlacesError::UpstreamStatus { status } => {
            tracing::warn!(status, "Google Places request failed");
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            ApiError::new(status, "Google API request failed")
        }
        PlacesError::Api { status, message } => {
            tracing::warn!(%status, message = message.as_deref().unwrap_or(""), "Google Places rejected request");
            ApiError::new(StatusCode::BAD_GATEWAY, "Google API request failed")
        }
        other => ApiError::internal(fallback_message, other),
    }
}

pub(super) async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let input = params
        .input
        .filter(|i| !i.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing input parameter"))?;
    let client = configured_client(&state)?;

    let suggestions = client
        .autocomplete(&input)
        .await
        .map_err(|e| upstream_error(&e, "Failed to fetch suggestions"))?;

    Ok(Json(AutocompleteResponse {
        suggestions: suggestions
            .into_iter()
            .map(|s| SuggestionItem {
                description: s.description,
                place_id: s.place_id,
            })
            .collect(),
    }))
}

pub(super) async fn details(
    State(state): State<AppState>,
    Query(params): Query<DetailsParams>,
) -> Result<Json<PlaceDetails>, ApiError> {
    let place_id = params
        .place_id
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing placeId parameter"))?;
    let client = configured_client(&state)?;

    client
        .place_details(&place_id)
        .await
        .map(Json)
        .map_err(|e| upstream_error(&e, "Failed to fetch place details"))
}
