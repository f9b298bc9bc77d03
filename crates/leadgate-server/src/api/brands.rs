use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use leadgate_core::BrandConfig;
use leadgate_flows::{brand_page as build_brand_page, BrandPage, RouteError, RouteTarget};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct BrandList {
    brands: Vec<BrandConfig>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BrandPageParams {
    zip: Option<String>,
    source: Option<String>,
    addr: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RouteParams {
    q: Option<String>,
}

pub(super) async fn list_brands(State(state): State<AppState>) -> Json<BrandList> {
    Json(BrandList {
        brands: state.registry.all_brands().to_vec(),
    })
}

pub(super) async fn brand_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<BrandPageParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page: BrandPage<'_> = build_brand_page(
        &state.registry,
        &slug,
        params.zip.as_deref(),
        params.source.as_deref(),
        params.addr.as_deref(),
    )
    .ok_or_else(|| ApiError::not_found("Brand not found"))?;

    serde_json::to_value(&page)
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to render brand page", &e))
}

pub(super) async fn route(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
) -> Result<Json<RouteTarget>, ApiError> {
    let input = params.q.unwrap_or_default();
    state.router.route(&input).await.map(Json).map_err(|e| {
        let status = match e {
            RouteError::InvalidInput | RouteError::UnresolvableAddress => StatusCode::BAD_REQUEST,
            RouteError::NotServiced => StatusCode::NOT_FOUND,
            RouteError::LookupFailed => StatusCode::BAD_GATEWAY,
        };
        ApiError::new(status, e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::{app, get, offline_state, send};

    #[tokio::test]
    async fn lists_brands_in_table_order() {
        let (status, json) = send(app(offline_state()), get("/api/brands")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = json["brands"]
            .as_array()
            .expect("array")
            .iter()
            .map(|b| b["id"].as_str().expect("id").to_string())
            .collect();
        assert_eq!(
            ids,
            [
                "safehaven-nc",
                "safehaven-sc",
                "safehaven-tn",
                "topsecurity",
                "bestsecurity",
                "redhawk"
            ]
        );
    }

    #[tokio::test]
    async fn brand_page_from_router_auto_opens_form() {
        let (status, json) = send(
            app(offline_state()),
            get("/api/brands/safehaven-nc?zip=27601&addr=456%20Oak%20Avenue&source=google"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["brand"]["id"], "safehaven-nc");
        assert_eq!(json["zip"], "27601");
        assert_eq!(json["initialAddress"], "456 Oak Avenue");
        assert_eq!(json["autoOpenLeadFormAfterMs"], 1000);
        assert_eq!(json["phoneNumber"], "(800) 123-4568");
    }

    #[tokio::test]
    async fn unknown_brand_is_not_found() {
        let (status, json) = send(app(offline_state()), get("/api/brands/acme")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Brand not found");
    }

    #[tokio::test]
    async fn route_resolves_zip() {
        let (status, json) = send(app(offline_state()), get("/api/route?q=27601")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["brandId"], "safehaven-nc");
        assert_eq!(json["location"], "/brand/safehaven-nc?zip=27601");
    }

    #[tokio::test]
    async fn route_reports_unserviced_area() {
        let (status, json) = send(app(offline_state()), get("/api/route?q=99999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json["error"],
            "Sorry, we don't service that area yet. Please call for availability."
        );
    }

    #[tokio::test]
    async fn route_rejects_short_input() {
        let (status, json) = send(app(offline_state()), get("/api/route?q=2")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Please enter a valid ZIP code or address");
    }
}
