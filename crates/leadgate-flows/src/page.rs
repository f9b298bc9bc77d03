//! View model for a brand landing page.

use std::time::Duration;

use leadgate_core::{
    format_phone_number, phone_for_source, phone_link, BrandConfig, BrandRegistry,
};
use serde::Serialize;

use crate::analytics::{AnalyticsEvent, AnalyticsSink};

/// Delay before the lead form opens for visitors sent by the ZIP router.
pub const AUTO_OPEN_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandPage<'a> {
    pub brand: &'a BrandConfig,
    /// Number for the visitor's marketing source, `(AAA) BBB-CCCC`.
    pub phone_number: String,
    pub phone_href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Prefill for the lead form's address field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_address: Option<String>,
    #[serde(
        rename = "autoOpenLeadFormAfterMs",
        serialize_with = "serialize_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_open_lead_form_after: Option<Duration>,
}

impl BrandPage<'_> {
    /// Reports a tap on the page's phone number.
    pub fn track_phone_click(&self, analytics: &dyn AnalyticsSink) {
        analytics.track(AnalyticsEvent::PhoneClick {
            phone_number: self.phone_number.clone(),
            source: self.source.clone().unwrap_or_else(|| "direct".to_string()),
            brand_id: self.brand.id.clone(),
        });
    }
}

#[allow(clippy::ref_option)]
fn serialize_millis<S: serde::Serializer>(
    value: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => serializer.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        None => serializer.serialize_none(),
    }
}

/// Builds the page for `slug`, or `None` for an unknown slug.
///
/// A `zip` means the visitor came through the router, which opens the lead
/// form after [`AUTO_OPEN_DELAY`].
#[must_use]
pub fn brand_page<'a>(
    registry: &'a BrandRegistry,
    slug: &str,
    zip: Option<&str>,
    source: Option<&str>,
    addr: Option<&str>,
) -> Option<BrandPage<'a>> {
    let brand = registry.get_brand_by_slug(slug)?;
    let present = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

    let zip = present(zip);
    let source = present(source);
    let number = phone_for_source(brand, source.as_deref());

    Some(BrandPage {
        brand,
        phone_number: format_phone_number(number),
        phone_href: phone_link(number),
        auto_open_lead_form_after: zip.as_ref().map(|_| AUTO_OPEN_DELAY),
        zip,
        source,
        initial_address: present(addr),
    })
}
