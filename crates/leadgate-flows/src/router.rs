//! Entry flow: free text (ZIP or address) in, brand landing page out.

use std::sync::Arc;

use leadgate_core::{BrandConfig, BrandRegistry};
use leadgate_places::{AddressSuggestion, PlaceLookup};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use thiserror::Error;

use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::wizard::MIN_SUGGESTION_INPUT;

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const REDIRECT_ORIGIN: &str = "homepage";

/// Why routing stopped. `Display` is the message shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Please enter a valid ZIP code or address")]
    InvalidInput,

    #[error("Unable to determine service area from address")]
    UnresolvableAddress,

    #[error("Sorry, we don't service that area yet. Please call for availability.")]
    NotServiced,

    #[error("Unable to process your request. Please try again.")]
    LookupFailed,
}

/// A successful route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTarget {
    pub brand_id: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Brand page path with `zip` and `addr` query parameters when known.
    pub location: String,
}

impl RouteTarget {
    fn new(brand: &BrandConfig, zip: Option<String>, address: Option<String>) -> Self {
        let mut query = Vec::new();
        if let Some(zip) = &zip {
            query.push(format!("zip={}", utf8_percent_encode(zip, URI_COMPONENT)));
        }
        if let Some(address) = &address {
            query.push(format!("addr={}", utf8_percent_encode(address, URI_COMPONENT)));
        }
        let location = if query.is_empty() {
            format!("/brand/{}", brand.slug)
        } else {
            format!("/brand/{}?{}", brand.slug, query.join("&"))
        };

        Self {
            brand_id: brand.id.clone(),
            slug: brand.slug.clone(),
            zip,
            address,
            location,
        }
    }
}

#[derive(Clone)]
pub struct ZipRouter {
    registry: Arc<BrandRegistry>,
    lookup: Arc<dyn PlaceLookup>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl std::fmt::Debug for ZipRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipRouter")
            .field("brands", &self.registry.all_brands().len())
            .finish_non_exhaustive()
    }
}

impl ZipRouter {
    #[must_use]
    pub fn new(
        registry: Arc<BrandRegistry>,
        lookup: Arc<dyn PlaceLookup>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            registry,
            lookup,
            analytics,
        }
    }

    /// Suggestions to show while the visitor types. Empty for short input
    /// or when the lookup fails.
    pub async fn suggest(&self, input: &str) -> Vec<AddressSuggestion> {
        if input.trim().chars().count() < MIN_SUGGESTION_INPUT {
            return Vec::new();
        }
        self.lookup.suggestions(input).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "router suggestions unavailable");
            Vec::new()
        })
    }

    /// Routes free text. A bare five-digit ZIP is resolved directly; anything
    /// else is treated as an address and resolved through the first
    /// suggestion's place details.
    ///
    /// # Errors
    ///
    /// Returns the [`RouteError`] whose message the visitor should see.
    pub async fn route(&self, input: &str) -> Result<RouteTarget, RouteError> {
        let input = input.trim();
        if input.chars().count() < MIN_SUGGESTION_INPUT {
            return Err(RouteError::InvalidInput);
        }

        if is_bare_zip(input) {
            return self.route_location(Some(input), None, None);
        }

        let suggestions = self.lookup.suggestions(input).await.map_err(|e| {
            tracing::error!(error = %e, "address lookup failed while routing");
            RouteError::LookupFailed
        })?;
        let Some(first) = suggestions.first() else {
            return Err(RouteError::InvalidInput);
        };

        let details = self.lookup.details(&first.place_id).await.map_err(|e| {
            tracing::error!(error = %e, place_id = %first.place_id, "place details failed while routing");
            RouteError::LookupFailed
        })?;
        if details.is_unroutable() {
            return Err(RouteError::UnresolvableAddress);
        }

        self.route_location(
            details.zip_code.as_deref(),
            details.state.as_deref(),
            details.formatted_address.as_deref(),
        )
    }

    /// Routes from a suggestion the visitor picked, using its embedded
    /// ZIP/state when present and place details otherwise.
    ///
    /// # Errors
    ///
    /// Returns the [`RouteError`] whose message the visitor should see.
    pub async fn choose_suggestion(
        &self,
        suggestion: &AddressSuggestion,
    ) -> Result<RouteTarget, RouteError> {
        if suggestion.zip_code.is_some() || suggestion.state.is_some() {
            return self.route_location(
                suggestion.zip_code.as_deref(),
                suggestion.state.as_deref(),
                Some(&suggestion.description),
            );
        }

        let details = self.lookup.details(&suggestion.place_id).await.map_err(|e| {
            tracing::error!(error = %e, place_id = %suggestion.place_id, "place details failed while routing");
            RouteError::LookupFailed
        })?;
        if details.is_unroutable() {
            return Err(RouteError::UnresolvableAddress);
        }

        self.route_location(
            details.zip_code.as_deref(),
            details.state.as_deref(),
            details.formatted_address.as_deref(),
        )
    }

    fn route_location(
        &self,
        zip: Option<&str>,
        state: Option<&str>,
        address: Option<&str>,
    ) -> Result<RouteTarget, RouteError> {
        let Some(brand) = self.registry.get_brand_for_location(zip, state) else {
            tracing::info!(zip, state, "location outside every service area");
            return Err(RouteError::NotServiced);
        };

        self.analytics.track(AnalyticsEvent::BrandRedirect {
            from: REDIRECT_ORIGIN.to_string(),
            to: brand.id.clone(),
            zip: zip.unwrap_or_default().to_string(),
        });

        Ok(RouteTarget::new(
            brand,
            zip.filter(|z| !z.is_empty()).map(str::to_string),
            address.filter(|a| !a.is_empty()).map(str::to_string),
        ))
    }
}

fn is_bare_zip(input: &str) -> bool {
    input.len() == 5 && input.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use leadgate_places::{AddressResolver, PlaceDetails, PlacesError};

    use super::*;
    use crate::analytics::RecordingAnalytics;

    fn router_with(lookup: Arc<dyn PlaceLookup>) -> (ZipRouter, Arc<RecordingAnalytics>) {
        let analytics = Arc::new(RecordingAnalytics::new());
        let registry = Arc::new(BrandRegistry::builtin().expect("builtin brands"));
        (ZipRouter::new(registry, lookup, analytics.clone()), analytics)
    }

    fn offline_router() -> (ZipRouter, Arc<RecordingAnalytics>) {
        router_with(Arc::new(AddressResolver::offline()))
    }

    struct FailingLookup;

    #[async_trait]
    impl PlaceLookup for FailingLookup {
        async fn suggestions(&self, _: &str) -> Result<Vec<AddressSuggestion>, PlacesError> {
            Err(PlacesError::UpstreamStatus { status: 500 })
        }

        async fn details(&self, _: &str) -> Result<PlaceDetails, PlacesError> {
            Err(PlacesError::UpstreamStatus { status: 500 })
        }
    }

    /// Suggests one place whose details carry nothing routable.
    struct VagueLookup;

    #[async_trait]
    impl PlaceLookup for VagueLookup {
        async fn suggestions(&self, _: &str) -> Result<Vec<AddressSuggestion>, PlacesError> {
            Ok(vec![AddressSuggestion::new("Somewhere", "vague")])
        }

        async fn details(&self, _: &str) -> Result<PlaceDetails, PlacesError> {
            Ok(PlaceDetails::default())
        }
    }

    /// Details with an empty postal component and no state.
    struct BlankZipLookup;

    #[async_trait]
    impl PlaceLookup for BlankZipLookup {
        async fn suggestions(&self, _: &str) -> Result<Vec<AddressSuggestion>, PlacesError> {
            Ok(vec![AddressSuggestion::new("Somewhere", "blank")])
        }

        async fn details(&self, _: &str) -> Result<PlaceDetails, PlacesError> {
            Ok(PlaceDetails {
                zip_code: Some(String::new()),
                ..PlaceDetails::default()
            })
        }
    }

    #[tokio::test]
    async fn bare_zip_routes_directly() {
        let (router, analytics) = offline_router();
        let target = router.route("27601").await.expect("route");
        assert_eq!(target.brand_id, "safehaven-nc");
        assert_eq!(target.location, "/brand/safehaven-nc?zip=27601");
        assert_eq!(
            analytics.events(),
            [AnalyticsEvent::BrandRedirect {
                from: "homepage".to_string(),
                to: "safehaven-nc".to_string(),
                zip: "27601".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn short_input_is_invalid() {
        let (router, _) = offline_router();
        let err = router.route(" 27 ").await.unwrap_err();
        assert_eq!(err, RouteError::InvalidInput);
        assert_eq!(err.to_string(), "Please enter a valid ZIP code or address");
    }

    #[tokio::test]
    async fn unknown_zip_is_not_serviced_and_emits_nothing() {
        let (router, analytics) = offline_router();
        let err = router.route("99999").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sorry, we don't service that area yet. Please call for availability."
        );
        assert!(analytics.events().is_empty());
    }

    #[tokio::test]
    async fn address_routes_through_place_details() {
        let (router, _) = offline_router();
        let target = router.route("Columbia").await.expect("route");
        assert_eq!(target.brand_id, "safehaven-sc");
        assert_eq!(target.zip.as_deref(), Some("29201"));
        assert!(target.location.starts_with("/brand/safehaven-sc?zip=29201&addr="));
        assert!(target.location.contains("%2C%20Columbia"));
    }

    #[tokio::test]
    async fn address_without_suggestions_is_invalid() {
        let (router, _) = offline_router();
        assert_eq!(
            router.route("no such place anywhere").await.unwrap_err(),
            RouteError::InvalidInput
        );
    }

    #[tokio::test]
    async fn vague_details_cannot_be_routed() {
        let (router, _) = router_with(Arc::new(VagueLookup));
        assert_eq!(
            router.route("Somewhere").await.unwrap_err().to_string(),
            "Unable to determine service area from address"
        );
    }

    #[tokio::test]
    async fn blank_postal_code_cannot_be_routed() {
        let (router, analytics) = router_with(Arc::new(BlankZipLookup));
        assert_eq!(
            router.route("Somewhere").await.unwrap_err(),
            RouteError::UnresolvableAddress
        );
        assert!(analytics.events().is_empty());
    }

    #[tokio::test]
    async fn lookup_failure_asks_to_retry() {
        let (router, _) = router_with(Arc::new(FailingLookup));
        assert_eq!(
            router.route("100 Main St").await.unwrap_err().to_string(),
            "Unable to process your request. Please try again."
        );
        assert!(router.suggest("100 Main St").await.is_empty());
    }

    #[tokio::test]
    async fn chosen_suggestion_with_embedded_state_routes_without_details() {
        let (router, _) = router_with(Arc::new(FailingLookup));
        let mut suggestion = AddressSuggestion::new("1 Broadway, Nashville, TN", "ChIJ-nash");
        suggestion.state = Some("TN".to_string());

        let target = router.choose_suggestion(&suggestion).await.expect("route");
        assert_eq!(target.brand_id, "safehaven-tn");
        assert_eq!(
            target.location,
            "/brand/safehaven-tn?addr=1%20Broadway%2C%20Nashville%2C%20TN"
        );
    }

    #[tokio::test]
    async fn suggest_ignores_short_input() {
        let (router, _) = offline_router();
        assert!(router.suggest("Ch").await.is_empty());
        assert_eq!(router.suggest("Charlotte").await.len(), 1);
    }
}
