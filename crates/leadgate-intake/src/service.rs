use std::sync::Arc;

use chrono::{DateTime, Utc};
use leadgate_core::{LeadRecord, LeadSubmission};
use uuid::Uuid;

use crate::memory::InMemoryLeadStore;
use crate::repository::{LeadPage, LeadQuery, LeadRepository};
use crate::IntakeError;

/// Returned to the submitter on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadReceipt {
    pub lead_id: Uuid,
}

/// Validates submissions and hands them to a [`LeadRepository`].
#[derive(Clone)]
pub struct LeadIntake {
    repo: Arc<dyn LeadRepository>,
}

impl std::fmt::Debug for LeadIntake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadIntake")
            .field("store", &self.repo.kind())
            .finish()
    }
}

impl Default for LeadIntake {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl LeadIntake {
    #[must_use]
    pub fn new(repo: Arc<dyn LeadRepository>) -> Self {
        Self { repo }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryLeadStore::new()))
    }

    #[must_use]
    pub fn store_kind(&self) -> &'static str {
        self.repo.kind()
    }

    /// Validates and stores a submission, stamped with the current time.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::Validation`] naming every missing required field.
    /// - [`IntakeError::Sqlx`] if the store rejects the write.
    pub async fn submit(&self, submission: LeadSubmission) -> Result<LeadReceipt, IntakeError> {
        self.submit_at(submission, Utc::now()).await
    }

    /// As [`submit`](Self::submit) with an explicit intake time.
    ///
    /// # Errors
    ///
    /// See [`submit`](Self::submit).
    pub async fn submit_at(
        &self,
        submission: LeadSubmission,
        now: DateTime<Utc>,
    ) -> Result<LeadReceipt, IntakeError> {
        let lead = submission.into_lead_data(now)?;
        let record = LeadRecord::new(lead, now);
        let lead_id = record.id;

        tracing::info!(
            %lead_id,
            brand_id = %record.lead.brand_id,
            service_type = %record.lead.service_type,
            source = record.lead.attribution.source.as_deref().unwrap_or("direct"),
            "lead received"
        );

        self.repo.append(record).await?;
        Ok(LeadReceipt { lead_id })
    }

    /// Newest-first summaries, optionally filtered by brand.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Sqlx`] if the store query fails.
    pub async fn list(&self, brand_id: Option<&str>, limit: usize) -> Result<LeadPage, IntakeError> {
        self.repo.query(&LeadQuery::new(brand_id, limit)).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use leadgate_core::LeadValidationError;

    use super::*;

    fn submission(brand: &str) -> LeadSubmission {
        serde_json::from_value(serde_json::json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "9195550100",
            "zipCode": "27601",
            "address": "100 Fayetteville St",
            "serviceType": "Home Security System",
            "brandId": brand,
            "utm_source": "google",
            "source": "google"
        }))
        .expect("submission")
    }

    #[tokio::test]
    async fn submit_then_list_round_trips_summary() {
        let intake = LeadIntake::in_memory();
        let receipt = intake.submit(submission("safehaven-nc")).await.expect("submit");

        let page = intake.list(None, 10).await.expect("list");
        assert_eq!(page.total, 1);
        assert_eq!(page.leads[0].id, receipt.lead_id);
        assert_eq!(page.leads[0].source.as_deref(), Some("google"));
    }

    #[tokio::test]
    async fn missing_fields_are_reported_in_order() {
        let intake = LeadIntake::in_memory();
        let mut sub = submission("safehaven-nc");
        sub.email = Some("   ".to_string());
        sub.brand_id = None;

        let err = intake.submit(sub).await.unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(
            err,
            IntakeError::Validation(LeadValidationError::MissingFields(ref f))
                if f == &["email", "brandId"]
        ));
        assert_eq!(
            err.to_string(),
            "Missing required fields: email, brandId"
        );
        assert_eq!(intake.list(None, 10).await.expect("list").total, 0);
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_limited() {
        let intake = LeadIntake::in_memory();
        let base = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).single().expect("ts");
        for i in 0..5 {
            intake
                .submit_at(submission("redhawk"), base + Duration::minutes(i))
                .await
                .expect("submit");
        }
        intake
            .submit_at(submission("topsecurity"), base + Duration::hours(1))
            .await
            .expect("submit");

        let page = intake.list(Some("redhawk"), 3).await.expect("list");
        assert_eq!(page.total, 5);
        assert_eq!(page.leads.len(), 3);
        assert!(page
            .leads
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
        assert!(page.leads.iter().all(|l| l.brand_id == "redhawk"));
    }
}
