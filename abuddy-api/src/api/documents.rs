//! Linked document endpoints

use abuddy_common::api::{ApiResponse, LinkedDocumentCreate, LinkedDocumentUpdate, LinkedDocumentView};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::appliances::require_appliance;
use super::error::{ApiError, ApiResult};
use super::extract::{parse_id, Caller, ValidatedJson};
use crate::db::documents;
use crate::AppState;

/// GET /api/appliances/:id/documents
pub async fn list_documents(
    State(state): State<AppState>,
    caller: Caller,
    Path(appliance_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<LinkedDocumentView>>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let documents = documents::list_documents(&state.db, &appliance_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ApiResponse::ok(documents)))
}

/// GET /api/appliances/:id/documents/:document_id
pub async fn get_document(
    State(state): State<AppState>,
    caller: Caller,
    Path((appliance_id, document_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<LinkedDocumentView>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let document_id = parse_id("id", &document_id)?;

    let document = documents::get_document(&state.db, &appliance_id, &document_id)
        .await?
        .ok_or(ApiError::NotFound("Linked document"))?;

    Ok(Json(ApiResponse::ok(document.into())))
}

/// POST /api/appliances/:id/documents
pub async fn create_document(
    State(state): State<AppState>,
    caller: Caller,
    Path(appliance_id): Path<String>,
    ValidatedJson(input): ValidatedJson<LinkedDocumentCreate>,
) -> ApiResult<(StatusCode, Json<ApiResponse<LinkedDocumentView>>)> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let mut conn = state.db.acquire().await?;
    let document = documents::insert_document(&mut conn, &appliance_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(document.into()).with_message("Linked document created successfully")),
    ))
}

/// PUT /api/appliances/:id/documents/:document_id
pub async fn update_document(
    State(state): State<AppState>,
    caller: Caller,
    Path((appliance_id, document_id)): Path<(String, String)>,
    ValidatedJson(changes): ValidatedJson<LinkedDocumentUpdate>,
) -> ApiResult<Json<ApiResponse<LinkedDocumentView>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let document_id = parse_id("id", &document_id)?;

    let document = documents::update_document(&state.db, &appliance_id, &document_id, &changes)
        .await?
        .ok_or(ApiError::NotFound("Linked document"))?;

    Ok(Json(
        ApiResponse::ok(document.into()).with_message("Linked document updated successfully"),
    ))
}

/// DELETE /api/appliances/:id/documents/:document_id
pub async fn delete_document(
    State(state): State<AppState>,
    caller: Caller,
    Path((appliance_id, document_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let appliance_id = require_appliance(&state, &caller, &appliance_id).await?;
    let document_id = parse_id("id", &document_id)?;

    if !documents::delete_document(&state.db, &appliance_id, &document_id).await? {
        return Err(ApiError::NotFound("Linked document"));
    }

    Ok(Json(ApiResponse::message("Linked document deleted successfully")))
}
