//! Maintenance task endpoints
//!
//! Responses always carry the status derived from today's date; any status
//! a client sends is ignored.

use std::str::FromStr;

use abuddy_common::api::{ApiResponse, MaintenanceTaskCreate, MaintenanceTaskUpdate, MaintenanceTaskView};
use abuddy_common::{time, MaintenanceStatus};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::appliances::require_appliance;
use super::error::{ApiError, ApiResult};
use super::extract::{parse_id, Caller, QueryParams, ValidatedJson};
use crate::db::maintenance;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    /// Filter on the derived status
    pub status: Option<String>,
}

/// GET /api/appliances/:id/maintenance
pub async fn list_tasks(
    State(state): State<AppState>,
    caller: Caller,
    Path(appliance_id): Path<String>,
    QueryParams(query): QueryParams<TaskQuery>,
) -> ApiResult<Json<ApiResponse<Vec<MaintenanceTaskView>>>> {
    let filter = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            MaintenanceStatus::from_str(raw)
                .map_err(|_| ApiError::field("status", "Invalid maintenance status filter"))?,
        ),
    };
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let today = time::today();

    let tasks = maintenance::list_tasks(&state.db, &appliance_id)
        .await?
        .into_iter()
        .map(|task| task.into_view(today))
        .filter(|view| filter.map_or(true, |status| view.status == status))
        .collect();

    Ok(Json(ApiResponse::ok(tasks)))
}

/// GET /api/appliances/:id/maintenance/:task_id
pub async fn get_task(
    State(state): State<AppState>,
    caller: Caller,
    Path((appliance_id, task_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<MaintenanceTaskView>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let task_id = parse_id("id", &task_id)?;

    let task = maintenance::get_task(&state.db, &appliance_id, &task_id)
        .await?
        .ok_or(ApiError::NotFound("Maintenance task"))?;

    Ok(Json(ApiResponse::ok(task.into_view(time::today()))))
}

/// POST /api/appliances/:id/maintenance
pub async fn create_task(
    State(state): State<AppState>,
    caller: Caller,
    Path(appliance_id): Path<String>,
    ValidatedJson(input): ValidatedJson<MaintenanceTaskCreate>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MaintenanceTaskView>>)> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let mut conn = state.db.acquire().await?;
    let task = maintenance::insert_task(&mut conn, &appliance_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(task.into_view(time::today()))
                .with_message("Maintenance task created successfully"),
        ),
    ))
}

/// PUT /api/appliances/:id/maintenance/:task_id
pub async fn update_task(
    State(state): State<AppState>,
    caller: Caller,
    Path((appliance_id, task_id)): Path<(String, String)>,
    ValidatedJson(changes): ValidatedJson<MaintenanceTaskUpdate>,
) -> ApiResult<Json<ApiResponse<MaintenanceTaskView>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let task_id = parse_id("id", &task_id)?;

    let task = maintenance::update_task(&state.db, &appliance_id, &task_id, &changes)
        .await?
        .ok_or(ApiError::NotFound("Maintenance task"))?;

    Ok(Json(
        ApiResponse::ok(task.into_view(time::today()))
            .with_message("Maintenance task updated successfully"),
    ))
}

/// DELETE /api/appliances/:id/maintenance/:task_id
pub async fn delete_task(
    State(state): State<AppState>,
    caller: Caller,
    Path((appliance_id, task_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let task_id = parse_id("id", &task_id)?;

    if !maintenance::delete_task(&state.db, &appliance_id, &task_id).await? {
        return Err(ApiError::NotFound("Maintenance task"));
    }

    Ok(Json(ApiResponse::message("Maintenance task deleted successfully")))
}
