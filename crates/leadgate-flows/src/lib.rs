//! Visitor-facing flows: the ZIP router, the three-step lead form and the
//! brand page model, plus the analytics and draft stores they report to.

pub mod analytics;
pub mod draft;
pub mod page;
pub mod router;
pub mod suggestions;
pub mod wizard;

pub use analytics::{AnalyticsEvent, AnalyticsSink, RecordingAnalytics, TracingAnalytics};
pub use draft::{draft_key, DraftStore, InMemoryDraftStore, LeadDraft};
pub use page::{brand_page, BrandPage, AUTO_OPEN_DELAY};
pub use router::{RouteError, RouteTarget, ZipRouter};
pub use suggestions::{SuggestionTicket, SuggestionTracker};
pub use wizard::{
    AddressQuery, FieldError, LeadFormWizard, LeadSink, WizardContext, WizardStatus, WizardStep,
};

use leadgate_intake::IntakeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{} field(s) failed validation", .0.len())]
    InvalidFields(Vec<FieldError>),

    #[error("the form can only be submitted from the service step")]
    NotAtFinalStep,

    #[error("the form was already submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error("lead submission rejected: {0}")]
    Rejected(String),
}
