//! Phone number selection and formatting for brand pages.

use crate::brands::BrandConfig;

/// Returns the number to display for a visitor arriving from `source`.
///
/// Source matching is case-insensitive; unknown or absent sources get the
/// brand's default number.
#[must_use]
pub fn phone_for_source<'a>(brand: &'a BrandConfig, source: Option<&str>) -> &'a str {
    let numbers = &brand.phone_numbers;
    source
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .and_then(|s| numbers.by_source.get(&s))
        .map_or(numbers.default.as_str(), String::as_str)
}

/// Formats a US number as `(AAA) BBB-CCCC`.
///
/// Accepts ten digits, or eleven with a leading `1`. Anything else is
/// returned unchanged.
#[must_use]
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let local = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return phone.to_string(),
    };
    format!("({}) {}-{}", &local[..3], &local[3..6], &local[6..])
}

/// Builds a `tel:` link for a US number.
#[must_use]
pub fn phone_link(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let local = match digits.strip_prefix('1') {
        Some(rest) if digits.len() == 11 => rest,
        _ => digits.as_str(),
    };
    format!("tel:+1{local}")
}
