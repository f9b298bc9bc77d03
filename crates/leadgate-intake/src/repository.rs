use async_trait::async_trait;
use leadgate_core::{LeadRecord, LeadSummary};

use crate::IntakeError;

/// Filter and page size for a lead listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadQuery {
    pub brand_id: Option<String>,
    pub limit: usize,
}

impl LeadQuery {
    #[must_use]
    pub fn new(brand_id: Option<&str>, limit: usize) -> Self {
        Self {
            brand_id: brand_id
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
            limit,
        }
    }
}

/// One page of summaries, newest first. `total` counts every lead matching
/// the filter, not just the returned ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadPage {
    pub leads: Vec<LeadSummary>,
    pub total: usize,
}

/// Append-only lead storage.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn append(&self, record: LeadRecord) -> Result<(), IntakeError>;

    async fn query(&self, query: &LeadQuery) -> Result<LeadPage, IntakeError>;

    /// Short name reported by the health endpoint.
    fn kind(&self) -> &'static str;
}
