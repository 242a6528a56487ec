//! Support contact endpoints

use abuddy_common::api::{ApiResponse, SupportContactCreate, SupportContactUpdate, SupportContactView};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::appliances::require_appliance;
use super::error::{ApiError, ApiResult};
use super::extract::{parse_id, Caller, ValidatedJson};
use crate::db::contacts;
use crate::AppState;

/// GET /api/appliances/:id/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    caller: Caller,
    Path(appliance_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<SupportContactView>>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let contacts = contacts::list_contacts(&state.db, &appliance_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ApiResponse::ok(contacts)))
}

/// GET /api/appliances/:id/contacts/:contact_id
pub async fn get_contact(
    State(state): State<AppState>,
    caller: Caller,
    Path((appliance_id, contact_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<SupportContactView>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let contact_id = parse_id("id", &contact_id)?;

    let contact = contacts::get_contact(&state.db, &appliance_id, &contact_id)
        .await?
        .ok_or(ApiError::NotFound("Support contact"))?;

    Ok(Json(ApiResponse::ok(contact.into())))
}

/// POST /api/appliances/:id/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    caller: Caller,
    Path(appliance_id): Path<String>,
    ValidatedJson(input): ValidatedJson<SupportContactCreate>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SupportContactView>>)> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let mut conn = state.db.acquire().await?;
    let contact = contacts::insert_contact(&mut conn, &appliance_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(contact.into()).with_message("Support contact created successfully")),
    ))
}

/// PUT /api/appliances/:id/contacts/:contact_id
pub async fn update_contact(
    State(state): State<AppState>,
    caller: Caller,
    Path((appliance_id, contact_id)): Path<(String, String)>,
    ValidatedJson(changes): ValidatedJson<SupportContactUpdate>,
) -> ApiResult<Json<ApiResponse<SupportContactView>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let contact_id = parse_id("id", &contact_id)?;

    let contact = contacts::update_contact(&state.db, &appliance_id, &contact_id, &changes)
        .await?
        .ok_or(ApiError::NotFound("Support contact"))?;

    Ok(Json(
        ApiResponse::ok(contact.into()).with_message("Support contact updated successfully"),
    ))
}

/// DELETE /api/appliances/:id/contacts/:contact_id
pub async fn delete_contact(
    State(state): State<AppState>,
    caller: Caller,
    Path((appliance_id, contact_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let contact_id = parse_id("id", &contact_id)?;

    if !contacts::delete_contact(&state.db, &appliance_id, &contact_id).await? {
        return Err(ApiError::NotFound("Support contact"));
    }

    Ok(Json(ApiResponse::message("Support contact deleted successfully")))
}
