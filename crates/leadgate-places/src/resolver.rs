use async_trait::async_trait;

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::fallback::{fallback_place_details, fallback_suggestions};
use crate::types::{AddressSuggestion, PlaceDetails};

/// Upper bound on suggestions handed to a form or router.
pub const MAX_SUGGESTIONS: usize = 5;

/// Address lookups as seen by the routing and form flows.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// At most [`MAX_SUGGESTIONS`] candidates for free-text `input`.
    async fn suggestions(&self, input: &str) -> Result<Vec<AddressSuggestion>, PlacesError>;

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError>;
}

/// Places lookups that degrade to the static dataset instead of failing.
///
/// Built without a client (no API key configured) it answers from the
/// fallback data only.
#[derive(Debug, Clone, Default)]
pub struct AddressResolver {
    client: Option<PlacesClient>,
}

impl AddressResolver {
    #[must_use]
    pub fn new(client: Option<PlacesClient>) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn offline() -> Self {
        Self { client: None }
    }

    /// Suggestions from upstream, or from the fallback list on any failure.
    pub async fn get_address_suggestions(&self, input: &str) -> Vec<AddressSuggestion> {
        if input.trim().is_empty() {
            return Vec::new();
        }
        let Some(client) = &self.client else {
            return fallback_suggestions(input);
        };

        match client.autocomplete(input).await {
            Ok(mut suggestions) => {
                suggestions.truncate(MAX_SUGGESTIONS);
                suggestions
            }
            Err(e) => {
                tracing::warn!(error = %e, "falling back to static address suggestions");
                fallback_suggestions(input)
            }
        }
    }

    /// Details from upstream, or from the fallback list on any failure.
    pub async fn get_place_details(&self, place_id: &str) -> PlaceDetails {
        let Some(client) = &self.client else {
            return fallback_place_details(place_id);
        };

        match client.place_details(place_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(error = %e, place_id, "falling back to static place details");
                fallback_place_details(place_id)
            }
        }
    }
}

#[async_trait]
impl PlaceLookup for AddressResolver {
    async fn suggestions(&self, input: &str) -> Result<Vec<AddressSuggestion>, PlacesError> {
        Ok(self.get_address_suggestions(input).await)
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        Ok(self.get_place_details(place_id).await)
    }
}
