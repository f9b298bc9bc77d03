use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Extension, Json,
};
use leadgate_core::{LeadSubmission, LeadSummary};
use leadgate_intake::IntakeError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_limit, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LeadCreated {
    success: bool,
    lead_id: Uuid,
    message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LeadListParams {
    brand_id: Option<String>,
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct LeadList {
    leads: Vec<LeadSummary>,
    total: usize,
}

pub(super) async fn create_lead(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<Json<LeadCreated>, ApiError> {
    let Json(submission) = body.map_err(|rejection| {
        tracing::debug!(request_id = %req_id.0, error = %rejection.body_text(), "unreadable lead body");
        ApiError::bad_request("Invalid JSON body")
    })?;

    match state.intake.submit(submission).await {
        Ok(receipt) => Ok(Json(LeadCreated {
            success: true,
            lead_id: receipt.lead_id,
            message: "Lead submitted successfully",
        })),
        Err(IntakeError::Validation(e)) => Err(ApiError::bad_request(e.to_string())),
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "lead submission failed");
            Err(ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process lead submission",
            ))
        }
    }
}

pub(super) async fn list_leads(
    State(state): State<AppState>,
    params: Result<Query<LeadListParams>, QueryRejection>,
) -> Result<Json<LeadList>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "unreadable lead list query");
        ApiError::bad_request("Invalid query parameters")
    })?;
    let limit = normalize_limit(params.limit);
    let page = state
        .intake
        .list(params.brand_id.as_deref(), limit)
        .await
        .map_err(|e| ApiError::internal("Failed to list leads", &e))?;

    Ok(Json(LeadList {
        leads: page.leads,
        total: page.total,
    }))
}
