//! Lead intake: validation, persistence behind [`LeadRepository`], and
//! newest-first listing.

pub mod memory;
pub mod postgres;
pub mod repository;
pub mod service;

pub use memory::InMemoryLeadStore;
pub use postgres::{connect_pool, PgLeadStore};
pub use repository::{LeadPage, LeadQuery, LeadRepository};
pub use service::{LeadIntake, LeadReceipt};

use leadgate_core::LeadValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] LeadValidationError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl IntakeError {
    /// True when the caller sent bad input rather than the store failing.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
