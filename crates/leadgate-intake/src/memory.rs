use async_trait::async_trait;
use leadgate_core::LeadRecord;
use tokio::sync::RwLock;

use crate::repository::{LeadPage, LeadQuery, LeadRepository};
use crate::IntakeError;

/// Process-local lead store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<Vec<LeadRecord>>,
}

impl InMemoryLeadStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.leads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.leads.read().await.is_empty()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadStore {
    async fn append(&self, record: LeadRecord) -> Result<(), IntakeError> {
        self.leads.write().await.push(record);
        Ok(())
    }

    async fn query(&self, query: &LeadQuery) -> Result<LeadPage, IntakeError> {
        let leads = self.leads.read().await;
        let mut matching: Vec<&LeadRecord> = leads
            .iter()
            .filter(|r| {
                query
                    .brand_id
                    .as_deref()
                    .is_none_or(|brand| r.lead.brand_id == brand)
            })
            .collect();
        let total = matching.len();

        matching.sort_by(|a, b| b.lead.timestamp.cmp(&a.lead.timestamp));
        matching.truncate(query.limit);

        Ok(LeadPage {
            leads: matching.into_iter().map(LeadRecord::summary).collect(),
            total,
        })
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
