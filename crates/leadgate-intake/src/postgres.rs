//! Postgres-backed [`LeadRepository`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leadgate_core::{Attribution, LeadData, LeadRecord, LeadSummary};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::repository::{LeadPage, LeadQuery, LeadRepository};
use crate::IntakeError;

const ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/leadgate-intake/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Connect to a Postgres pool.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .connect(database_url)
        .await
}

#[derive(Debug, Clone)]
pub struct PgLeadStore {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    name: String,
    service_type: String,
    brand_id: String,
    source: Option<String>,
    submitted_at: DateTime<Utc>,
}

impl From<SummaryRow> for LeadSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            service_type: row.service_type,
            brand_id: row.brand_id,
            source: row.source,
            timestamp: row.submitted_at,
        }
    }
}

/// A full row from the `leads` table.
#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    zip_code: String,
    address: String,
    service_type: String,
    brand_id: String,
    source: Option<String>,
    utm_source: Option<String>,
    utm_medium: Option<String>,
    utm_campaign: Option<String>,
    utm_term: Option<String>,
    utm_content: Option<String>,
    session_id: Option<String>,
    submitted_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<LeadRow> for LeadRecord {
    fn from(row: LeadRow) -> Self {
        Self {
            id: row.id,
            lead: LeadData {
                name: row.name,
                email: row.email,
                phone: row.phone,
                zip_code: row.zip_code,
                address: row.address,
                service_type: row.service_type,
                brand_id: row.brand_id,
                attribution: Attribution {
                    source: row.source,
                    utm_source: row.utm_source,
                    utm_medium: row.utm_medium,
                    utm_campaign: row.utm_campaign,
                    utm_term: row.utm_term,
                    utm_content: row.utm_content,
                },
                session_id: row.session_id,
                timestamp: row.submitted_at,
            },
            created_at: row.created_at,
        }
    }
}

impl PgLeadStore {
    /// Wraps an existing pool. Does not run migrations.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Wraps `pool` after applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Migration`] if a migration fails.
    pub async fn migrated(pool: PgPool) -> Result<Self, IntakeError> {
        MIGRATOR.run(&pool).await?;
        Ok(Self { pool })
    }

    /// Fetches a single stored lead by id.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Sqlx`] if the query fails.
    pub async fn get(&self, id: Uuid) -> Result<Option<LeadRecord>, IntakeError> {
        let row = sqlx::query_as::<_, LeadRow>(
            "SELECT id, name, email, phone, zip_code, address, service_type, brand_id, \
                    source, utm_source, utm_medium, utm_campaign, utm_term, utm_content, \
                    session_id, submitted_at, created_at \
             FROM leads WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LeadRecord::from))
    }
}

#[async_trait]
impl LeadRepository for PgLeadStore {
    async fn append(&self, record: LeadRecord) -> Result<(), IntakeError> {
        let lead = &record.lead;
        let attribution = &lead.attribution;

        sqlx::query(
            "INSERT INTO leads (id, name, email, phone, zip_code, address, service_type, \
                                brand_id, source, utm_source, utm_medium, utm_campaign, \
                                utm_term, utm_content, session_id, submitted_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(record.id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.zip_code)
        .bind(&lead.address)
        .bind(&lead.service_type)
        .bind(&lead.brand_id)
        .bind(&attribution.source)
        .bind(&attribution.utm_source)
        .bind(&attribution.utm_medium)
        .bind(&attribution.utm_campaign)
        .bind(&attribution.utm_term)
        .bind(&attribution.utm_content)
        .bind(&lead.session_id)
        .bind(lead.timestamp)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn query(&self, query: &LeadQuery) -> Result<LeadPage, IntakeError> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT id, name, service_type, brand_id, source, submitted_at \
             FROM leads \
             WHERE ($1::TEXT IS NULL OR brand_id = $1) \
             ORDER BY submitted_at DESC, created_at DESC \
             LIMIT $2",
        )
        .bind(query.brand_id.as_deref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leads WHERE ($1::TEXT IS NULL OR brand_id = $1)",
        )
        .bind(query.brand_id.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(LeadPage {
            leads: rows.into_iter().map(LeadSummary::from).collect(),
            total: usize::try_from(total).unwrap_or_default(),
        })
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
