//! Lead records: the submission payload, its validated form, and the
//! summary shape returned by listings.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const SERVICE_TYPES: [&str; 6] = [
    "Home Security System",
    "Business Security",
    "Smart Home Integration",
    "Video Surveillance",
    "Access Control",
    "Fire & Life Safety",
];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    Name,
    Email,
    Phone,
    ZipCode,
    Address,
    ServiceType,
    BrandId,
}

/// Fields a lead must carry, in the order they are reported when missing.
pub const REQUIRED_LEAD_FIELDS: [LeadField; 7] = [
    LeadField::Name,
    LeadField::Email,
    LeadField::Phone,
    LeadField::ZipCode,
    LeadField::Address,
    LeadField::ServiceType,
    LeadField::BrandId,
];

impl LeadField {
    /// Name of the field on the wire (`zipCode`, not `zip_code`).
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Email => "email",
            LeadField::Phone => "phone",
            LeadField::ZipCode => "zipCode",
            LeadField::Address => "address",
            LeadField::ServiceType => "serviceType",
            LeadField::BrandId => "brandId",
        }
    }

    /// Checks a form value against this field's entry rule.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message for the first rule the value breaks.
    pub fn validate(self, value: &str) -> Result<(), &'static str> {
        let value = value.trim();
        let len = value.chars().count();
        let ok = match self {
            LeadField::Name => len >= 2,
            LeadField::Email => EMAIL_RE.is_match(value),
            LeadField::Phone => len >= 10,
            LeadField::ZipCode | LeadField::Address => len >= 5,
            LeadField::ServiceType | LeadField::BrandId => len >= 1,
        };
        if ok {
            return Ok(());
        }
        Err(match self {
            LeadField::Name => "Name must be at least 2 characters",
            LeadField::Email => "Please enter a valid email address",
            LeadField::Phone => "Please enter a valid phone number",
            LeadField::ZipCode => "Please enter a valid ZIP code",
            LeadField::Address => "Please enter your address",
            LeadField::ServiceType => "Please select a service type",
            LeadField::BrandId => "Missing brand",
        })
    }
}

impl std::fmt::Display for LeadField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Marketing attribution captured from the landing URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
}

impl Attribution {
    /// Picks the attribution keys out of decoded query-string pairs.
    /// Empty values are ignored.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut attribution = Self::default();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            let slot = match key {
                "source" => &mut attribution.source,
                "utm_source" => &mut attribution.utm_source,
                "utm_medium" => &mut attribution.utm_medium,
                "utm_campaign" => &mut attribution.utm_campaign,
                "utm_term" => &mut attribution.utm_term,
                "utm_content" => &mut attribution.utm_content,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        attribution
    }
}

/// Lead payload as submitted. Every field is optional here so that missing
/// fields can be reported together instead of failing on the first one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub service_type: Option<String>,
    pub brand_id: Option<String>,
    #[serde(flatten)]
    pub attribution: Attribution,
    pub session_id: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeadValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl LeadSubmission {
    fn field(&self, field: LeadField) -> Option<&str> {
        let value = match field {
            LeadField::Name => &self.name,
            LeadField::Email => &self.email,
            LeadField::Phone => &self.phone,
            LeadField::ZipCode => &self.zip_code,
            LeadField::Address => &self.address,
            LeadField::ServiceType => &self.service_type,
            LeadField::BrandId => &self.brand_id,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Wire names of required fields that are absent, empty, or blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_LEAD_FIELDS
            .iter()
            .filter(|f| self.field(**f).is_none())
            .map(|f| f.wire_name())
            .collect()
    }

    /// Validates presence of required fields and turns the payload into a
    /// [`LeadData`]. A missing timestamp is filled with `now`.
    ///
    /// # Errors
    ///
    /// - [`LeadValidationError::MissingFields`] listing every absent field.
    /// - [`LeadValidationError::InvalidTimestamp`] if `timestamp` is not RFC 3339.
    pub fn into_lead_data(self, now: DateTime<Utc>) -> Result<LeadData, LeadValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(LeadValidationError::MissingFields(missing));
        }

        let timestamp = match self.timestamp.as_deref().map(str::trim) {
            None | Some("") => now,
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map_err(|_| LeadValidationError::InvalidTimestamp(raw.to_string()))?
                .with_timezone(&Utc),
        };

        let take = |value: Option<String>| value.unwrap_or_default().trim().to_string();

        Ok(LeadData {
            name: take(self.name),
            email: take(self.email),
            phone: take(self.phone),
            zip_code: take(self.zip_code),
            address: take(self.address),
            service_type: take(self.service_type),
            brand_id: take(self.brand_id),
            attribution: self.attribution,
            session_id: self.session_id.filter(|s| !s.is_empty()),
            timestamp,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub zip_code: String,
    pub address: String,
    pub service_type: String,
    pub brand_id: String,
    #[serde(flatten)]
    pub attribution: Attribution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A stored lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub lead: LeadData,
    pub created_at: DateTime<Utc>,
}

impl LeadRecord {
    #[must_use]
    pub fn new(lead: LeadData, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            lead,
            created_at,
        }
    }

    #[must_use]
    pub fn summary(&self) -> LeadSummary {
        LeadSummary {
            id: self.id,
            name: self.lead.name.clone(),
            service_type: self.lead.service_type.clone(),
            brand_id: self.lead.brand_id.clone(),
            source: self.lead.attribution.source.clone(),
            timestamp: self.lead.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummary {
    pub id: Uuid,
    pub name: String,
    pub service_type: String,
    pub brand_id: String,
    pub source: Option<String>,
    pub timestamp: DateTime<Utc>,
}
