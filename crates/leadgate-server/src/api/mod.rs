mod brands;
mod leads;
mod maps;
mod weather;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use leadgate_core::BrandRegistry;
use leadgate_flows::ZipRouter;
use leadgate_intake::LeadIntake;
use leadgate_places::PlacesClient;
use leadgate_weather::WeatherService;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState,
};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<BrandRegistry>,
    /// Direct Places access for the map proxy endpoints. `None` when no key
    /// is configured.
    pub places: Option<PlacesClient>,
    pub router: ZipRouter,
    pub weather: WeatherService,
    pub intake: LeadIntake,
}

/// Error response rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// A 500 whose cause is logged but not shown to the caller.
    pub fn internal(message: impl Into<String>, cause: &dyn std::error::Error) -> Self {
        let message = message.into();
        tracing::error!(error = %cause, "{message}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}

/// Lead listing page size: default 10, at most 100.
pub(super) fn normalize_limit(limit: Option<i64>) -> usize {
    usize::try_from(limit.unwrap_or(10).clamp(1, 100)).unwrap_or(10)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct HealthData {
    status: &'static str,
    lead_store: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let leads = post(leads::create_lead)
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
        .merge(get(leads::list_leads).layer(axum::middleware::from_fn_with_state(
            auth,
            require_bearer_auth,
        )));

    Router::new()
        .route("/api/health", get(health))
        .route("/api/leads", leads)
        .route("/api/maps/autocomplete", get(maps::autocomplete))
        .route("/api/maps/details", get(maps::details))
        .route("/api/weather", get(weather::current_weather))
        .route("/api/brands", get(brands::list_brands))
        .route("/api/brands/{slug}", get(brands::brand_page))
        .route("/api/route", get(brands::route))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        lead_store: state.intake.store_kind(),
    })
}

/// Lead submissions allowed per minute from one client.
pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(30, Duration::from_secs(60))
}
