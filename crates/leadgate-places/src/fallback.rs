//! Offline address data used when the Places API is unavailable.

use crate::resolver::MAX_SUGGESTIONS;
use crate::types::{AddressSuggestion, PlaceDetails};

struct FallbackAddress {
    description: &'static str,
    place_id: &'static str,
    zip_code: &'static str,
    city: &'static str,
    state: &'static str,
}

const FALLBACK_ADDRESSES: [FallbackAddress; 7] = [
    FallbackAddress {
        description: "123 Main Street, Charlotte, NC 28202",
        place_id: "mock1",
        zip_code: "28202",
        city: "Charlotte",
        state: "NC",
    },
    FallbackAddress {
        description: "456 Oak Avenue, Raleigh, NC 27601",
        place_id: "mock2",
        zip_code: "27601",
        city: "Raleigh",
        state: "NC",
    },
    FallbackAddress {
        description: "789 Pine Road, Columbia, SC 29201",
        place_id: "mock3",
        zip_code: "29201",
        city: "Columbia",
        state: "SC",
    },
    FallbackAddress {
        description: "321 Elm Street, Atlanta, GA 30309",
        place_id: "mock4",
        zip_code: "30309",
        city: "Atlanta",
        state: "GA",
    },
    FallbackAddress {
        description: "654 Maple Drive, Miami, FL 33101",
        place_id: "mock5",
        zip_code: "33101",
        city: "Miami",
        state: "FL",
    },
    FallbackAddress {
        description: "987 Cedar Lane, Birmingham, AL 35201",
        place_id: "mock6",
        zip_code: "35201",
        city: "Birmingham",
        state: "AL",
    },
    FallbackAddress {
        description: "147 Birch Court, Nashville, TN 37201",
        place_id: "mock7",
        zip_code: "37201",
        city: "Nashville",
        state: "TN",
    },
];

impl FallbackAddress {
    fn to_suggestion(&self) -> AddressSuggestion {
        AddressSuggestion {
            description: self.description.to_string(),
            place_id: self.place_id.to_string(),
            zip_code: Some(self.zip_code.to_string()),
            city: Some(self.city.to_string()),
            state: Some(self.state.to_string()),
        }
    }
}

/// Filters the static list by case-insensitive substring match on the
/// description, or plain substring match on the ZIP. Blank input yields
/// nothing. Never fails; at most [`MAX_SUGGESTIONS`] results.
#[must_use]
pub fn fallback_suggestions(input: &str) -> Vec<AddressSuggestion> {
    let needle = input.trim();
    if needle.is_empty() {
        return Vec::new();
    }
    let lowered = needle.to_lowercase();

    FALLBACK_ADDRESSES
        .iter()
        .filter(|a| a.description.to_lowercase().contains(&lowered) || a.zip_code.contains(needle))
        .take(MAX_SUGGESTIONS)
        .map(FallbackAddress::to_suggestion)
        .collect()
}

/// Details for a fallback place id, or empty details for anything else.
#[must_use]
pub fn fallback_place_details(place_id: &str) -> PlaceDetails {
    FALLBACK_ADDRESSES
        .iter()
        .find(|a| a.place_id == place_id)
        .map_or_else(PlaceDetails::default, |a| PlaceDetails {
            zip_code: Some(a.zip_code.to_string()),
            city: Some(a.city.to_string()),
            state: Some(a.state.to_string()),
            formatted_address: Some(a.description.to_string()),
        })
}
