//! Address autocomplete and place details for lead routing.
//!
//! [`PlacesClient`] talks to the Google Places web service. [`AddressResolver`]
//! wraps it with a static fallback dataset so callers always get an answer,
//! even offline or without an API key.

pub mod client;
pub mod error;
pub mod fallback;
pub mod resolver;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use fallback::{fallback_place_details, fallback_suggestions};
pub use resolver::{AddressResolver, PlaceLookup, MAX_SUGGESTIONS};
pub use types::{AddressSuggestion, PlaceDetails};
