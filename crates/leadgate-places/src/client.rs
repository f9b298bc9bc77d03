//! HTTP client for the Google Places web service.
//!
//! Covers the two calls lead routing needs: address autocomplete restricted
//! to US street addresses, and place details limited to address components
//! and the formatted address.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::{AddressSuggestion, AutocompleteResponse, DetailsResponse, PlaceDetails};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Client for the Google Places API.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so relative joins append instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    /// Fetches US street-address predictions for `input`.
    ///
    /// Returned suggestions carry only `description` and `place_id`; call
    /// [`PlacesClient::place_details`] to resolve the ZIP and state.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::UpstreamStatus`] on a non-2xx response.
    /// - [`PlacesError::Api`] if the body reports a status other than
    ///   `OK` or `ZERO_RESULTS`.
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::Deserialize`] if the body has an unexpected shape.
    pub async fn autocomplete(&self, input: &str) -> Result<Vec<AddressSuggestion>, PlacesError> {
        let url = self.build_url(
            "place/autocomplete/json",
            &[
                ("input", input),
                ("types", "address"),
                ("components", "country:us"),
            ],
        )?;
        let body = self.request_text(&url).await?;
        let parsed: AutocompleteResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: "place/autocomplete".to_string(),
                source: e,
            })?;
        check_api_status(parsed.status.as_deref(), parsed.error_message)?;

        Ok(parsed
            .predictions
            .into_iter()
            .map(|p| AddressSuggestion::new(p.description, p.place_id))
            .collect())
    }

    /// Resolves a place id to its ZIP, city, state and formatted address.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PlacesClient::autocomplete`].
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let url = self.build_url(
            "place/details/json",
            &[
                ("place_id", place_id),
                ("fields", "address_component,formatted_address"),
            ],
        )?;
        let body = self.request_text(&url).await?;
        let parsed: DetailsResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: format!("place/details(place_id={place_id})"),
                source: e,
            })?;
        check_api_status(parsed.status.as_deref(), parsed.error_message)?;

        Ok(parsed.result.map_or_else(PlaceDetails::default, |r| {
            PlaceDetails::from_components(&r.address_components, r.formatted_address)
        }))
    }

    /// Builds the endpoint URL with `key` plus `params`, percent-encoded.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn request_text(&self, url: &Url) -> Result<String, PlacesError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Places API request failed");
            return Err(PlacesError::UpstreamStatus {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// `OK` and `ZERO_RESULTS` are successes; a missing status is tolerated.
fn check_api_status(status: Option<&str>, message: Option<String>) -> Result<(), PlacesError> {
    match status {
        None | Some("OK" | "ZERO_RESULTS") => Ok(()),
        Some(other) => Err(PlacesError::Api {
            status: other.to_string(),
            message,
        }),
    }
}
