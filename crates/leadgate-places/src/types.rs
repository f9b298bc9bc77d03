use serde::{Deserialize, Serialize};

/// One autocomplete candidate. Upstream results carry only a description and
/// place id; fallback entries also carry the resolved ZIP/city/state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSuggestion {
    pub description: String,
    pub place_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AddressSuggestion {
    #[must_use]
    pub fn new(description: impl Into<String>, place_id: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            place_id: place_id.into(),
            zip_code: None,
            city: None,
            state: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
}

impl PlaceDetails {
    /// True when neither a ZIP nor a state is known, i.e. nothing to route on.
    /// Empty components count as unknown.
    #[must_use]
    pub fn is_unroutable(&self) -> bool {
        let blank = |v: Option<&str>| v.is_none_or(|s| s.trim().is_empty());
        blank(self.zip_code.as_deref()) && blank(self.state.as_deref())
    }

    /// Extracts ZIP, city and state from Google address components.
    ///
    /// `postal_code` and `locality` use the long name;
    /// `administrative_area_level_1` uses the short name (`NC`, not
    /// `North Carolina`). Later components overwrite earlier ones.
    pub(crate) fn from_components(
        components: &[AddressComponent],
        formatted_address: Option<String>,
    ) -> Self {
        let mut details = Self {
            formatted_address,
            ..Self::default()
        };
        for comp in components {
            let has = |t: &str| comp.types.iter().any(|ty| ty == t);
            if has("postal_code") {
                details.zip_code = Some(comp.long_name.clone());
            }
            if has("locality") {
                details.city = Some(comp.long_name.clone());
            }
            if has("administrative_area_level_1") {
                details.state = Some(comp.short_name.clone());
            }
        }
        details
    }
}

// ---------------------------------------------------------------------------
// Google Places wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct AutocompleteResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Prediction {
    pub description: String,
    pub place_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(long: &str, short: &str, types: &[&str]) -> AddressComponent {
        AddressComponent {
            long_name: long.to_string(),
            short_name: short.to_string(),
            types: types.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn from_components_picks_long_and_short_names() {
        let details = PlaceDetails::from_components(
            &[
                component("456", "456", &["street_number"]),
                component("Raleigh", "Raleigh", &["locality", "political"]),
                component(
                    "North Carolina",
                    "NC",
                    &["administrative_area_level_1", "political"],
                ),
                component("27601", "27601", &["postal_code"]),
            ],
            Some("456 Oak Ave, Raleigh, NC 27601, USA".to_string()),
        );
        assert_eq!(details.zip_code.as_deref(), Some("27601"));
        assert_eq!(details.city.as_deref(), Some("Raleigh"));
        assert_eq!(details.state.as_deref(), Some("NC"));
        assert!(!details.is_unroutable());
    }

    #[test]
    fn empty_components_are_unroutable() {
        let details = PlaceDetails::from_components(&[], None);
        assert!(details.is_unroutable());
        let json = serde_json::to_value(&details).expect("serialize");
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn blank_zip_and_state_are_unroutable() {
        let details = PlaceDetails {
            zip_code: Some(String::new()),
            state: Some(" ".to_string()),
            ..PlaceDetails::default()
        };
        assert!(details.is_unroutable());

        let details = PlaceDetails {
            zip_code: Some(String::new()),
            state: Some("NC".to_string()),
            ..PlaceDetails::default()
        };
        assert!(!details.is_unroutable());
    }

    #[test]
    fn suggestion_serializes_place_id_camel_case() {
        let json = serde_json::to_value(AddressSuggestion::new("1 Main St", "abc")).expect("json");
        assert_eq!(json, serde_json::json!({"description": "1 Main St", "placeId": "abc"}));
    }
}
