//! The three-step lead form as a state machine.
//!
//! Contact → Location → Service → Submitting → Success. `next` validates
//! only the current step; `prev` never validates. Every edit is merged into
//! the per-brand draft so an abandoned form can be resumed, and the draft is
//! dropped only after a successful submission.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leadgate_core::{Attribution, LeadField, LeadSubmission};
use leadgate_intake::LeadIntake;
use leadgate_places::{AddressSuggestion, PlaceLookup};
use uuid::Uuid;

use crate::analytics::{AnalyticsEvent, AnalyticsSink, LEAD_FORM};
use crate::draft::{clear_draft, load_draft, save_draft, DraftStore, LeadDraft, FORM_FIELDS};
use crate::suggestions::{SuggestionTicket, SuggestionTracker};
use crate::FlowError;

/// Address edits shorter than this clear the suggestion list.
pub const MIN_SUGGESTION_INPUT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Contact,
    Location,
    Service,
}

impl WizardStep {
    pub const COUNT: u8 = 3;

    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Contact => 1,
            Self::Location => 2,
            Self::Service => 3,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Contact => "Personal Info",
            Self::Location => "Location",
            Self::Service => "Service",
        }
    }

    /// Fields validated before leaving this step.
    #[must_use]
    pub fn fields(self) -> &'static [LeadField] {
        match self {
            Self::Contact => &[LeadField::Name, LeadField::Email, LeadField::Phone],
            Self::Location => &[LeadField::ZipCode, LeadField::Address],
            Self::Service => &[LeadField::ServiceType],
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Contact => Self::Location,
            Self::Location | Self::Service => Self::Service,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Contact | Self::Location => Self::Contact,
            Self::Service => Self::Location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStatus {
    Editing,
    Submitting,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: LeadField,
    pub message: &'static str,
}

/// A started suggestion fetch. Hand the results back with
/// [`LeadFormWizard::apply_suggestions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    pub ticket: SuggestionTicket,
    pub input: String,
}

/// Where a finished form goes.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn submit_lead(&self, submission: LeadSubmission) -> Result<Uuid, FlowError>;
}

#[async_trait]
impl LeadSink for LeadIntake {
    async fn submit_lead(&self, submission: LeadSubmission) -> Result<Uuid, FlowError> {
        Ok(self.submit(submission).await?.lead_id)
    }
}

/// Visitor-scoped collaborators of a wizard.
#[derive(Clone)]
pub struct WizardContext {
    pub drafts: Arc<dyn DraftStore>,
    pub analytics: Arc<dyn AnalyticsSink>,
    /// UTM and source parameters from the landing URL.
    pub attribution: Attribution,
    pub session_id: String,
}

pub struct LeadFormWizard {
    brand_id: String,
    values: LeadDraft,
    step: WizardStep,
    status: WizardStatus,
    errors: Vec<FieldError>,
    suggestions: Vec<AddressSuggestion>,
    show_suggestions: bool,
    tracker: SuggestionTracker,
    ctx: WizardContext,
}

impl std::fmt::Debug for LeadFormWizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadFormWizard")
            .field("brand_id", &self.brand_id)
            .field("step", &self.step)
            .field("status", &self.status)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl LeadFormWizard {
    /// Opens the form for `brand_id`, prefilled from the router's ZIP and
    /// address and then from any saved draft. Emits `form_start`.
    #[must_use]
    pub fn new(
        brand_id: &str,
        ctx: WizardContext,
        initial_zip: Option<&str>,
        initial_address: Option<&str>,
    ) -> Self {
        let mut values = LeadDraft {
            zip_code: initial_zip.map(str::to_string),
            address: initial_address.map(str::to_string),
            ..LeadDraft::default()
        };

        let saved = load_draft(ctx.drafts.as_ref(), brand_id);
        let restored = LeadDraft {
            name: non_empty(saved.name),
            email: non_empty(saved.email),
            phone: non_empty(saved.phone),
            zip_code: non_empty(saved.zip_code),
            address: non_empty(saved.address),
            service_type: non_empty(saved.service_type),
        };
        values.merge(restored);

        ctx.analytics.track(AnalyticsEvent::FormStart {
            form_type: LEAD_FORM.to_string(),
            brand_id: brand_id.to_string(),
        });

        Self {
            brand_id: brand_id.to_string(),
            values,
            step: WizardStep::Contact,
            status: WizardStatus::Editing,
            errors: Vec::new(),
            suggestions: Vec::new(),
            show_suggestions: false,
            tracker: SuggestionTracker::new(),
            ctx,
        }
    }

    #[must_use]
    pub fn brand_id(&self) -> &str {
        &self.brand_id
    }

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn status(&self) -> WizardStatus {
        self.status
    }

    #[must_use]
    pub fn value(&self, field: LeadField) -> &str {
        self.values.get(field).unwrap_or_default()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn error_for(&self, field: LeadField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    /// Suggestions currently on screen; empty when hidden.
    #[must_use]
    pub fn visible_suggestions(&self) -> &[AddressSuggestion] {
        if self.show_suggestions {
            &self.suggestions
        } else {
            &[]
        }
    }

    /// Completion as a whole percentage: 33, 66 or 100.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let step = u16::from(self.step.number());
        u8::try_from(step * 100 / u16::from(WizardStep::COUNT)).unwrap_or(100)
    }

    /// Records an edit and persists it. Fields with a showing error are
    /// re-checked immediately.
    pub fn set_field(&mut self, field: LeadField, value: &str) {
        if field == LeadField::BrandId {
            return;
        }
        self.values.merge(LeadDraft::with_field(field, value));
        save_draft(
            self.ctx.drafts.as_ref(),
            &self.brand_id,
            LeadDraft::with_field(field, value),
        );

        if let Some(pos) = self.errors.iter().position(|e| e.field == field) {
            match field.validate(value) {
                Ok(()) => {
                    self.errors.remove(pos);
                }
                Err(message) => self.errors[pos].message = message,
            }
        }
    }

    /// Records an address edit. Returns the lookup to run when the input is
    /// long enough; otherwise clears the suggestion list.
    pub fn edit_address(&mut self, value: &str) -> Option<AddressQuery> {
        self.set_field(LeadField::Address, value);

        if value.chars().count() >= MIN_SUGGESTION_INPUT {
            Some(AddressQuery {
                ticket: self.tracker.begin(),
                input: value.to_string(),
            })
        } else {
            self.tracker.invalidate();
            self.suggestions.clear();
            self.show_suggestions = false;
            None
        }
    }

    /// Shows `suggestions` if `ticket` is still the latest request.
    /// Returns `false` for stale responses, which are dropped.
    pub fn apply_suggestions(
        &mut self,
        ticket: SuggestionTicket,
        suggestions: Vec<AddressSuggestion>,
    ) -> bool {
        if !self.tracker.is_current(ticket) {
            tracing::debug!(?ticket, "dropping stale address suggestions");
            return false;
        }
        self.suggestions = suggestions;
        self.show_suggestions = true;
        true
    }

    /// [`edit_address`](Self::edit_address) followed by the lookup.
    pub async fn update_address(&mut self, value: &str, lookup: &dyn PlaceLookup) {
        let Some(query) = self.edit_address(value) else {
            return;
        };
        match lookup.suggestions(&query.input).await {
            Ok(suggestions) => {
                self.apply_suggestions(query.ticket, suggestions);
            }
            Err(e) => tracing::warn!(error = %e, "address suggestions unavailable"),
        }
    }

    /// Hides the list and drops any lookup still in flight.
    pub fn blur_address(&mut self) {
        self.tracker.invalidate();
        self.show_suggestions = false;
    }

    /// Fills the address from a picked suggestion and back-fills the ZIP,
    /// from the suggestion itself or else from place details.
    pub async fn choose_suggestion(
        &mut self,
        suggestion: &AddressSuggestion,
        lookup: &dyn PlaceLookup,
    ) {
        self.tracker.invalidate();
        self.show_suggestions = false;
        self.suggestions.clear();
        self.set_field(LeadField::Address, &suggestion.description);

        if let Some(zip) = suggestion.zip_code.as_deref().filter(|z| !z.is_empty()) {
            self.set_field(LeadField::ZipCode, zip);
            return;
        }

        match lookup.details(&suggestion.place_id).await {
            Ok(details) => {
                if let Some(zip) = details.zip_code.as_deref().filter(|z| !z.is_empty()) {
                    self.set_field(LeadField::ZipCode, zip);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, place_id = %suggestion.place_id, "place details unavailable");
            }
        }
    }

    fn validate_fields(&self, fields: &[LeadField]) -> Vec<FieldError> {
        fields
            .iter()
            .filter_map(|&field| {
                field
                    .validate(self.value(field))
                    .err()
                    .map(|message| FieldError { field, message })
            })
            .collect()
    }

    /// Advances if the current step's fields are valid. On failure stays put
    /// with field errors set.
    pub fn next(&mut self) -> bool {
        if self.status != WizardStatus::Editing {
            return false;
        }
        self.errors = self.validate_fields(self.step.fields());
        if !self.errors.is_empty() {
            return false;
        }

        save_draft(self.ctx.drafts.as_ref(), &self.brand_id, self.values.clone());
        self.ctx.analytics.track(AnalyticsEvent::FormStep {
            step: self.step.number(),
            form_type: LEAD_FORM.to_string(),
            brand_id: self.brand_id.clone(),
        });
        self.step = self.step.next();
        true
    }

    pub fn prev(&mut self) {
        if self.status == WizardStatus::Editing {
            self.step = self.step.prev();
        }
    }

    /// Validates every field and hands the lead to `sink`, stamped with
    /// `now`, the brand, the session and the landing attribution.
    ///
    /// On success the draft is cleared and `form_complete` is emitted. On
    /// failure the wizard stays on the service step for a manual retry.
    ///
    /// # Errors
    ///
    /// - [`FlowError::AlreadySubmitted`] after a successful submission.
    /// - [`FlowError::NotAtFinalStep`] before the service step.
    /// - [`FlowError::InvalidFields`] if any field fails its rule.
    /// - Whatever `sink` returns.
    pub async fn submit(
        &mut self,
        sink: &dyn LeadSink,
        now: DateTime<Utc>,
    ) -> Result<Uuid, FlowError> {
        match self.status {
            WizardStatus::Success => return Err(FlowError::AlreadySubmitted),
            WizardStatus::Submitting | WizardStatus::Editing => {}
        }
        if self.step != WizardStep::Service {
            return Err(FlowError::NotAtFinalStep);
        }

        self.errors = self.validate_fields(&FORM_FIELDS);
        if !self.errors.is_empty() {
            return Err(FlowError::InvalidFields(self.errors.clone()));
        }

        self.status = WizardStatus::Submitting;
        let submission = self.build_submission(now);
        let service_type = self.value(LeadField::ServiceType).to_string();

        match sink.submit_lead(submission).await {
            Ok(lead_id) => {
                self.ctx.analytics.track(AnalyticsEvent::FormComplete {
                    brand_id: self.brand_id.clone(),
                    lead_id,
                    service_type,
                });
                clear_draft(self.ctx.drafts.as_ref(), &self.brand_id);
                self.status = WizardStatus::Success;
                Ok(lead_id)
            }
            Err(e) => {
                tracing::warn!(brand_id = %self.brand_id, error = %e, "lead submission failed");
                self.status = WizardStatus::Editing;
                Err(e)
            }
        }
    }

    fn build_submission(&self, now: DateTime<Utc>) -> LeadSubmission {
        let owned = |field| Some(self.value(field).to_string());
        LeadSubmission {
            name: owned(LeadField::Name),
            email: owned(LeadField::Email),
            phone: owned(LeadField::Phone),
            zip_code: owned(LeadField::ZipCode),
            address: owned(LeadField::Address),
            service_type: owned(LeadField::ServiceType),
            brand_id: Some(self.brand_id.clone()),
            attribution: self.ctx.attribution.clone(),
            session_id: Some(self.ctx.session_id.clone()),
            timestamp: Some(now.to_rfc3339()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use leadgate_places::{AddressResolver, PlaceDetails, PlacesError};

    use super::*;
    use crate::analytics::RecordingAnalytics;
    use crate::draft::{draft_key, InMemoryDraftStore};

    struct Harness {
        drafts: Arc<InMemoryDraftStore>,
        analytics: Arc<RecordingAnalytics>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                drafts: Arc::new(InMemoryDraftStore::new()),
                analytics: Arc::new(RecordingAnalytics::new()),
            }
        }

        fn ctx(&self) -> WizardContext {
            WizardContext {
                drafts: self.drafts.clone(),
                analytics: self.analytics.clone(),
                attribution: Attribution {
                    utm_source: Some("valpak".to_string()),
                    source: Some("valpak".to_string()),
                    ..Attribution::default()
                },
                session_id: "sess-42".to_string(),
            }
        }

        fn wizard(&self) -> LeadFormWizard {
            LeadFormWizard::new("safehaven-nc", self.ctx(), Some("27601"), None)
        }
    }

    fn fill_contact(w: &mut LeadFormWizard) {
        w.set_field(LeadField::Name, "Jane Doe");
        w.set_field(LeadField::Email, "jane@example.com");
        w.set_field(LeadField::Phone, "9195550100");
    }

    #[derive(Default)]
    struct CapturingSink {
        seen: Mutex<Vec<LeadSubmission>>,
        fail: bool,
    }

    #[async_trait]
    impl LeadSink for CapturingSink {
        async fn submit_lead(&self, submission: LeadSubmission) -> Result<Uuid, FlowError> {
            if self.fail {
                return Err(FlowError::Rejected("upstream down".to_string()));
            }
            self.seen.lock().expect("lock").push(submission);
            Ok(Uuid::new_v4())
        }
    }

    #[test]
    fn construction_emits_form_start_and_prefills_zip() {
        let h = Harness::new();
        let w = h.wizard();
        assert_eq!(w.step(), WizardStep::Contact);
        assert_eq!(w.value(LeadField::ZipCode), "27601");
        assert_eq!(w.progress_percent(), 33);
        assert_eq!(h.analytics.names(), ["form_start"]);
    }

    #[test]
    fn next_validates_only_current_step() {
        let h = Harness::new();
        let mut w = h.wizard();
        w.set_field(LeadField::Name, "J");
        assert!(!w.next());
        assert_eq!(w.step(), WizardStep::Contact);
        assert_eq!(
            w.error_for(LeadField::Name),
            Some("Name must be at least 2 characters")
        );
        assert!(w.error_for(LeadField::Email).is_some());
        assert!(w.error_for(LeadField::Address).is_none());

        fill_contact(&mut w);
        assert!(w.errors().is_empty());
        assert!(w.next());
        assert_eq!(w.step(), WizardStep::Location);
        assert_eq!(w.progress_percent(), 66);
        assert_eq!(h.analytics.names(), ["form_start", "form_step"]);
    }

    #[test]
    fn prev_never_validates_and_stops_at_first_step() {
        let h = Harness::new();
        let mut w = h.wizard();
        w.prev();
        assert_eq!(w.step(), WizardStep::Contact);

        fill_contact(&mut w);
        assert!(w.next());
        w.set_field(LeadField::Name, "");
        w.prev();
        assert_eq!(w.step(), WizardStep::Contact);
        assert!(w.errors().is_empty());
    }

    #[test]
    fn edits_persist_and_restore_into_new_wizard() {
        let h = Harness::new();
        {
            let mut w = h.wizard();
            w.set_field(LeadField::Name, "Jane Doe");
            w.set_field(LeadField::Phone, "");
        }
        assert!(h.drafts.get(&draft_key("safehaven-nc")).is_some());

        let restored = LeadFormWizard::new("safehaven-nc", h.ctx(), None, Some("1 Elm St"));
        assert_eq!(restored.value(LeadField::Name), "Jane Doe");
        assert_eq!(restored.value(LeadField::Phone), "");
        assert_eq!(restored.value(LeadField::Address), "1 Elm St");

        let other = LeadFormWizard::new("redhawk", h.ctx(), None, None);
        assert_eq!(other.value(LeadField::Name), "");
    }

    #[tokio::test]
    async fn short_address_edits_clear_suggestions() {
        let h = Harness::new();
        let mut w = h.wizard();
        let resolver = AddressResolver::offline();

        w.update_address("Charlotte", &resolver).await;
        assert_eq!(w.visible_suggestions().len(), 1);

        w.update_address("Ch", &resolver).await;
        assert!(w.visible_suggestions().is_empty());
    }

    #[test]
    fn stale_suggestion_responses_are_dropped() {
        let h = Harness::new();
        let mut w = h.wizard();
        let first = w.edit_address("100 Ma").expect("query");
        let second = w.edit_address("100 Mai").expect("query");

        let fresh = vec![AddressSuggestion::new("100 Main St", "fresh")];
        let stale = vec![AddressSuggestion::new("100 Maple Ave", "stale")];
        assert!(w.apply_suggestions(second.ticket, fresh));
        assert!(!w.apply_suggestions(first.ticket, stale));
        assert_eq!(w.visible_suggestions()[0].place_id, "fresh");

        w.blur_address();
        assert!(w.visible_suggestions().is_empty());
    }

    #[test]
    fn response_arriving_after_blur_stays_hidden() {
        let h = Harness::new();
        let mut w = h.wizard();
        let query = w.edit_address("100 Main").expect("query");

        w.blur_address();
        let late = vec![AddressSuggestion::new("100 Main St", "late")];
        assert!(!w.apply_suggestions(query.ticket, late));
        assert!(w.visible_suggestions().is_empty());
    }

    #[tokio::test]
    async fn choosing_suggestion_backfills_zip_from_details() {
        struct DetailsOnly;

        #[async_trait]
        impl PlaceLookup for DetailsOnly {
            async fn suggestions(&self, _: &str) -> Result<Vec<AddressSuggestion>, PlacesError> {
                Ok(Vec::new())
            }

            async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
                assert_eq!(place_id, "ChIJ-x");
                Ok(PlaceDetails {
                    zip_code: Some("28401".to_string()),
                    ..PlaceDetails::default()
                })
            }
        }

        let h = Harness::new();
        let mut w = LeadFormWizard::new("safehaven-nc", h.ctx(), None, None);
        w.choose_suggestion(&AddressSuggestion::new("5 Front St, Wilmington", "ChIJ-x"), &DetailsOnly)
            .await;

        assert_eq!(w.value(LeadField::Address), "5 Front St, Wilmington");
        assert_eq!(w.value(LeadField::ZipCode), "28401");
        let draft = load_draft(h.drafts.as_ref(), "safehaven-nc");
        assert_eq!(draft.zip_code.as_deref(), Some("28401"));
    }

    #[tokio::test]
    async fn submit_attaches_metadata_and_clears_draft() {
        let h = Harness::new();
        let mut w = h.wizard();
        fill_contact(&mut w);
        assert!(w.next());
        w.set_field(LeadField::Address, "100 Fayetteville St");
        assert!(w.next());
        w.set_field(LeadField::ServiceType, "Video Surveillance");

        let sink = CapturingSink::default();
        let now = Utc::now();
        w.submit(&sink, now).await.expect("submit");

        assert_eq!(w.status(), WizardStatus::Success);
        assert!(h.drafts.get(&draft_key("safehaven-nc")).is_none());

        let seen = sink.seen.lock().expect("lock");
        let sub = &seen[0];
        assert_eq!(sub.brand_id.as_deref(), Some("safehaven-nc"));
        assert_eq!(sub.session_id.as_deref(), Some("sess-42"));
        assert_eq!(sub.attribution.utm_source.as_deref(), Some("valpak"));
        assert_eq!(sub.timestamp.as_deref(), Some(now.to_rfc3339().as_str()));
        assert_eq!(
            h.analytics.names(),
            ["form_start", "form_step", "form_step", "form_complete"]
        );
    }

    #[tokio::test]
    async fn failed_submit_stays_on_service_step_and_keeps_draft() {
        let h = Harness::new();
        let mut w = h.wizard();
        fill_contact(&mut w);
        w.next();
        w.set_field(LeadField::Address, "100 Fayetteville St");
        w.next();
        w.set_field(LeadField::ServiceType, "Access Control");

        let sink = CapturingSink {
            fail: true,
            ..CapturingSink::default()
        };
        let err = w.submit(&sink, Utc::now()).await.unwrap_err();
        assert!(matches!(err, FlowError::Rejected(_)));
        assert_eq!(w.step(), WizardStep::Service);
        assert_eq!(w.status(), WizardStatus::Editing);
        assert!(h.drafts.get(&draft_key("safehaven-nc")).is_some());
    }

    #[tokio::test]
    async fn submit_before_final_step_is_refused() {
        let h = Harness::new();
        let mut w = h.wizard();
        let err = w
            .submit(&CapturingSink::default(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::NotAtFinalStep));
    }

    #[tokio::test]
    async fn submit_through_lead_intake() {
        let h = Harness::new();
        let intake = LeadIntake::in_memory();
        let mut w = h.wizard();
        fill_contact(&mut w);
        w.next();
        w.set_field(LeadField::Address, "100 Fayetteville St");
        w.next();
        w.set_field(LeadField::ServiceType, "Home Security System");

        let lead_id = w.submit(&intake, Utc::now()).await.expect("submit");
        let page = intake.list(Some("safehaven-nc"), 10).await.expect("list");
        assert_eq!(page.leads[0].id, lead_id);
        assert_eq!(page.leads[0].source.as_deref(), Some("valpak"));
    }
}
