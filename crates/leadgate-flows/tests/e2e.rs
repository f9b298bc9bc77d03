//! Visitor journeys from the ZIP box to a stored lead, offline.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use leadgate_core::{Attribution, BrandRegistry, LeadField};
use leadgate_flows::{
    brand_page, draft_key, DraftStore, InMemoryDraftStore, LeadFormWizard, RecordingAnalytics,
    RouteError, WizardContext, WizardStatus, WizardStep, ZipRouter,
};
use leadgate_intake::LeadIntake;
use leadgate_places::AddressResolver;

struct Visitor {
    registry: Arc<BrandRegistry>,
    resolver: Arc<AddressResolver>,
    drafts: Arc<InMemoryDraftStore>,
    analytics: Arc<RecordingAnalytics>,
    router: ZipRouter,
}

impl Visitor {
    fn new() -> Self {
        let registry = Arc::new(BrandRegistry::builtin().expect("builtin brands"));
        let resolver = Arc::new(AddressResolver::offline());
        let analytics = Arc::new(RecordingAnalytics::new());
        let router = ZipRouter::new(registry.clone(), resolver.clone(), analytics.clone());
        Self {
            registry,
            resolver,
            drafts: Arc::new(InMemoryDraftStore::new()),
            analytics,
            router,
        }
    }

    fn ctx(&self) -> WizardContext {
        WizardContext {
            drafts: self.drafts.clone(),
            analytics: self.analytics.clone(),
            attribution: Attribution::from_query_pairs([("utm_source", "google"), ("source", "google")]),
            session_id: "e2e-session".to_string(),
        }
    }
}

#[tokio::test]
async fn raleigh_zip_to_submitted_lead() {
    let visitor = Visitor::new();
    let intake = LeadIntake::in_memory();

    let target = visitor.router.route("27601").await.expect("routed");
    assert_eq!(target.brand_id, "safehaven-nc");
    assert_eq!(target.location, "/brand/safehaven-nc?zip=27601");

    let page = brand_page(
        &visitor.registry,
        &target.slug,
        target.zip.as_deref(),
        Some("google"),
        None,
    )
    .expect("brand page");
    assert_eq!(page.auto_open_lead_form_after, Some(Duration::from_secs(1)));

    let mut wizard = LeadFormWizard::new(
        &page.brand.id,
        visitor.ctx(),
        page.zip.as_deref(),
        page.initial_address.as_deref(),
    );
    assert_eq!(wizard.value(LeadField::ZipCode), "27601");

    wizard.set_field(LeadField::Name, "Jane Doe");
    wizard.set_field(LeadField::Email, "jane@example.com");
    wizard.set_field(LeadField::Phone, "(919) 555-0100");
    assert!(wizard.next());

    wizard.update_address("Raleigh", visitor.resolver.as_ref()).await;
    let pick = wizard.visible_suggestions()[0].clone();
    wizard.choose_suggestion(&pick, visitor.resolver.as_ref()).await;
    assert_eq!(wizard.value(LeadField::Address), "456 Oak Avenue, Raleigh, NC 27601");
    assert!(wizard.next());

    wizard.set_field(LeadField::ServiceType, "Home Security System");
    assert!(visitor.drafts.get(&draft_key("safehaven-nc")).is_some());

    let lead_id = wizard.submit(&intake, Utc::now()).await.expect("submitted");
    assert!(!lead_id.is_nil());
    assert_eq!(wizard.status(), WizardStatus::Success);
    assert_eq!(wizard.step(), WizardStep::Service);
    assert!(visitor.drafts.get(&draft_key("safehaven-nc")).is_none());

    let page = intake.list(None, 10).await.expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.leads[0].brand_id, "safehaven-nc");

    assert_eq!(
        visitor.analytics.names(),
        [
            "brand_redirect",
            "form_start",
            "form_step",
            "form_step",
            "form_complete"
        ]
    );
}

#[tokio::test]
async fn unserviced_zip_stops_at_router() {
    let visitor = Visitor::new();

    let err = visitor.router.route("99999").await.unwrap_err();
    assert_eq!(err, RouteError::NotServiced);
    assert_eq!(
        err.to_string(),
        "Sorry, we don't service that area yet. Please call for availability."
    );
    assert!(visitor.analytics.events().is_empty());
}
