//! Appliance endpoints

use std::str::FromStr;

use abuddy_common::api::{ApiResponse, ApplianceCreate, ApplianceSummary, ApplianceUpdate, ApplianceView};
use abuddy_common::{time, WarrantyStatus};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::extract::{parse_id, Caller, QueryParams, ValidatedJson};
use crate::db::{appliances, users};
use crate::pagination::calculate_pagination;
use crate::AppState;

/// Query parameters for GET /api/appliances
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceQuery {
    /// Case-insensitive match on name, brand or model
    pub search: Option<String>,
    /// `all`, `active`, `expiring` or `expired`
    pub warranty_status: Option<String>,
    /// Enables pagination when present
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn parse_warranty_filter(raw: Option<&str>) -> ApiResult<Option<WarrantyStatus>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => WarrantyStatus::from_str(value)
            .map(Some)
            .map_err(|_| ApiError::field("warrantyStatus", "Invalid warranty status filter")),
    }
}

/// GET /api/appliances
pub async fn list_appliances(
    State(state): State<AppState>,
    caller: Caller,
    QueryParams(query): QueryParams<ApplianceQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ApplianceView>>>> {
    let filter = parse_warranty_filter(query.warranty_status.as_deref())?;
    let today = time::today();

    let rows = appliances::list_appliances(&state.db, caller.user_id(), query.search.as_deref()).await?;
    let views: Vec<ApplianceView> = appliances::load_views(&state.db, rows, &state.policy, today)
        .await?
        .into_iter()
        .filter(|view| filter.map_or(true, |status| view.warranty_status == status))
        .collect();

    let Some(page) = query.page else {
        return Ok(Json(ApiResponse::ok(views)));
    };

    let total = views.len() as i64;
    let pagination = calculate_pagination(total, page, query.limit);
    Ok(Json(
        ApiResponse::ok(pagination.apply(views)).with_pagination(pagination.meta(total)),
    ))
}

/// GET /api/appliances/summary
pub async fn appliance_summary(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<ApiResponse<ApplianceSummary>>> {
    let rows = appliances::list_appliances(&state.db, caller.user_id(), None).await?;
    let views = appliances::load_views(&state.db, rows, &state.policy, time::today()).await?;

    Ok(Json(ApiResponse::ok(ApplianceSummary::from_appliances(&views))))
}

/// GET /api/appliances/:id
pub async fn get_appliance(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ApplianceView>>> {
    let id = parse_id("id", &id)?;
    let appliance = appliances::get_appliance(&state.db, &id, caller.user_id())
        .await?
        .ok_or(ApiError::NotFound("Appliance"))?;
    let view = appliances::load_view(&state.db, appliance, &state.policy, time::today()).await?;

    Ok(Json(ApiResponse::ok(view)))
}

/// POST /api/appliances
pub async fn create_appliance(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(input): ValidatedJson<ApplianceCreate>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ApplianceView>>)> {
    let identity = caller.require_auth()?;
    let appliance = {
        let mut conn = state.db.acquire().await?;
        users::ensure_user(&mut conn, identity).await?;
        appliances::insert_appliance(&mut conn, &identity.id, &input).await?
    };
    info!("Created appliance {} for user {}", appliance.id, identity.id);

    let view = appliances::load_view(&state.db, appliance, &state.policy, time::today()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(view).with_message("Appliance created successfully")),
    ))
}

/// PUT /api/appliances/:id
pub async fn update_appliance(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    ValidatedJson(changes): ValidatedJson<ApplianceUpdate>,
) -> ApiResult<Json<ApiResponse<ApplianceView>>> {
    let id = parse_id("id", &id)?;
    let appliance = appliances::update_appliance(&state.db, &id, caller.user_id(), &changes)
        .await?
        .ok_or(ApiError::NotFound("Appliance"))?;
    let view = appliances::load_view(&state.db, appliance, &state.policy, time::today()).await?;

    Ok(Json(ApiResponse::ok(view).with_message("Appliance updated successfully")))
}

/// DELETE /api/appliances/:id
pub async fn delete_appliance(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let id = parse_id("id", &id)?;
    if !appliances::delete_appliance(&state.db, &id, caller.user_id()).await? {
        return Err(ApiError::NotFound("Appliance"));
    }
    info!("Deleted appliance {}", id);

    Ok(Json(ApiResponse::message("Appliance deleted successfully")))
}

/// Parent check shared by the nested routes
pub(crate) async fn require_appliance(state: &AppState, caller: &Caller, raw_id: &str) -> ApiResult<String> {
    let id = parse_id("applianceId", raw_id)?;
    appliances::get_appliance(&state.db, &id, caller.user_id())
        .await?
        .ok_or(ApiError::NotFound("Appliance"))?;
    Ok(id)
}
