use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Brand used when a page is requested without a resolvable brand.
pub const DEFAULT_BRAND: &str = "safehaven-nc";

const BUILTIN_BRANDS_YAML: &str = include_str!("../../../config/brands.yaml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumbers {
    pub default: String,
    /// Per-marketing-source overrides (`google`, `valpak`, ...), keyed lowercase.
    #[serde(flatten)]
    pub by_source: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub states: Vec<String>,
    pub zip_codes: Vec<String>,
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaText {
    pub primary: String,
    pub secondary: String,
    pub form: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandConfig {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub phone_numbers: PhoneNumbers,
    pub coverage: Coverage,
    pub cta_text: CtaText,
    pub tagline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BrandsFile {
    brands: Vec<BrandConfig>,
}

/// Ordered, validated brand table.
///
/// Lookups scan in table order and return the first match, so the order of
/// entries in the YAML source decides overlapping coverage.
#[derive(Debug, Clone)]
pub struct BrandRegistry {
    brands: Vec<BrandConfig>,
}

impl BrandRegistry {
    /// Parses the brand table compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the embedded table fails to parse or validate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUILTIN_BRANDS_YAML)
    }

    /// Loads the built-in table, or the file at `path` when one is given.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::builtin();
        };
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BrandsFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML is malformed or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: BrandsFile = serde_yaml::from_str(content)?;
        Self::from_brands(file.brands)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first invalid entry.
    pub fn from_brands(brands: Vec<BrandConfig>) -> Result<Self, ConfigError> {
        validate_brands(&brands)?;
        Ok(Self { brands })
    }

    #[must_use]
    pub fn all_brands(&self) -> &[BrandConfig] {
        &self.brands
    }

    #[must_use]
    pub fn default_brand(&self) -> Option<&BrandConfig> {
        self.get_brand_by_id(DEFAULT_BRAND)
            .or_else(|| self.brands.first())
    }

    #[must_use]
    pub fn get_brand_by_id(&self, id: &str) -> Option<&BrandConfig> {
        self.brands.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn get_brand_by_slug(&self, slug: &str) -> Option<&BrandConfig> {
        self.brands.iter().find(|b| b.slug == slug)
    }

    /// Resolves a ZIP code to a brand.
    ///
    /// An exact five-digit match anywhere in the table wins over any prefix
    /// match. Failing that, the first brand listing a ZIP with the same
    /// three-digit prefix is returned. ZIP+4 input is reduced to its head.
    #[must_use]
    pub fn get_brand_by_zip(&self, zip: &str) -> Option<&BrandConfig> {
        let zip = normalize_zip(zip);
        if zip.is_empty() {
            return None;
        }

        if let Some(brand) = self
            .brands
            .iter()
            .find(|b| b.coverage.zip_codes.iter().any(|z| z == zip))
        {
            return Some(brand);
        }

        let prefix = zip.get(..3)?;
        self.brands.iter().find(|b| {
            b.coverage
                .zip_codes
                .iter()
                .any(|z| z.get(..3) == Some(prefix))
        })
    }

    #[must_use]
    pub fn get_brand_by_state(&self, state: &str) -> Option<&BrandConfig> {
        let state = state.trim().to_ascii_uppercase();
        if state.is_empty() {
            return None;
        }
        self.brands
            .iter()
            .find(|b| b.coverage.states.iter().any(|s| *s == state))
    }

    /// ZIP resolution first, then state. `None` means the area is not serviced.
    #[must_use]
    pub fn get_brand_for_location(
        &self,
        zip: Option<&str>,
        state: Option<&str>,
    ) -> Option<&BrandConfig> {
        zip.and_then(|z| self.get_brand_by_zip(z))
            .or_else(|| state.and_then(|s| self.get_brand_by_state(s)))
    }
}

fn normalize_zip(zip: &str) -> &str {
    let trimmed = zip.trim();
    trimmed
        .split_once('-')
        .map_or(trimmed, |(head, _)| head.trim_end())
}

fn is_zip5(value: &str) -> bool {
    value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_state_code(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|b| b.is_ascii_uppercase())
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn validate_brands(brands: &[BrandConfig]) -> Result<(), ConfigError> {
    if brands.is_empty() {
        return Err(ConfigError::Validation(
            "brand table must contain at least one brand".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for brand in brands {
        if brand.id.trim().is_empty() || brand.slug.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "brand '{}' must have a non-empty id and slug",
                brand.name
            )));
        }

        if brand.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "brand '{}' must have a non-empty name",
                brand.id
            )));
        }

        if !seen_ids.insert(brand.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand id: '{}'",
                brand.id
            )));
        }

        if !seen_slugs.insert(brand.slug.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand slug: '{}' (from brand '{}')",
                brand.slug, brand.id
            )));
        }

        if let Some(zip) = brand.coverage.zip_codes.iter().find(|z| !is_zip5(z)) {
            return Err(ConfigError::Validation(format!(
                "brand '{}' has invalid ZIP code '{zip}'; must be five digits",
                brand.id
            )));
        }

        if let Some(state) = brand.coverage.states.iter().find(|s| !is_state_code(s)) {
            return Err(ConfigError::Validation(format!(
                "brand '{}' has invalid state '{state}'; must be a two-letter uppercase code",
                brand.id
            )));
        }

        for color in [
            &brand.primary_color,
            &brand.secondary_color,
            &brand.accent_color,
        ] {
            if !is_hex_color(color) {
                return Err(ConfigError::Validation(format!(
                    "brand '{}' has invalid color '{color}'; expected #rrggbb",
                    brand.id
                )));
            }
        }

        if brand.phone_numbers.default.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "brand '{}' is missing a default phone number",
                brand.id
            )));
        }
    }

    Ok(())
}
