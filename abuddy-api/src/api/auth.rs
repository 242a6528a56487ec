//! Authentication middleware and account endpoints
//!
//! Authentication is optional on every `/api` route: a request without a
//! bearer token runs anonymously, a request with a token that the identity
//! provider rejects gets 401. Handlers that need a user call
//! [`Caller::require`].

use abuddy_common::api::{ApiResponse, UserProfile};
use abuddy_common::time;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

use super::error::{ApiError, ApiResult, AUTH_HEADER_REQUIRED, INVALID_TOKEN};
use super::extract::Caller;
use crate::db::{appliances, sample_data, users};
use crate::AppState;

/// Token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Optional authentication middleware
///
/// Stores a [`Caller`] in the request extensions for the handlers.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Owned: the request body is not Sync, so no borrow may cross the await
    let token = bearer_token(request.headers()).map(str::to_owned);

    let caller = match token {
        None => Caller(None),
        Some(token) => match state.identity.verify(&token).await? {
            Some(identity) => {
                debug!("Authenticated request for user {}", identity.id);
                Caller(Some(identity))
            }
            None => return Err(ApiError::Unauthorized(INVALID_TOKEN)),
        },
    };

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<ApiResponse<MeResponse>>> {
    let identity = caller.require(AUTH_HEADER_REQUIRED)?;
    let user = users::ensure_user(&mut *state.db.acquire().await?, identity).await?;

    Ok(Json(ApiResponse::ok(MeResponse { user: user.into() })))
}

/// POST /api/auth/logout
///
/// Tokens live with the client; there is no server session to end.
pub async fn logout(caller: Caller) -> Json<ApiResponse<()>> {
    if let Some(user_id) = caller.user_id() {
        info!("User {} logged out", user_id);
    }
    Json(ApiResponse::message("Logout successful"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPreview {
    pub has_existing_appliances: bool,
    pub existing_count: i64,
}

/// POST /api/auth/reset-sample-data
///
/// Reports what a reset would replace; nothing is changed.
pub async fn reset_sample_data(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<ApiResponse<ResetPreview>>> {
    let identity = caller.require(AUTH_HEADER_REQUIRED)?;
    let existing_count = appliances::count_for_user(&state.db, &identity.id).await?;

    let message = if existing_count > 0 {
        format!(
            "You have {} existing appliances. Continuing will delete them and load sample data.",
            existing_count
        )
    } else {
        "Sample data will be loaded for your account.".to_string()
    };

    Ok(Json(
        ApiResponse::ok(ResetPreview {
            has_existing_appliances: existing_count > 0,
            existing_count,
        })
        .with_message(message),
    ))
}

/// POST /api/auth/confirm-reset-sample-data
pub async fn confirm_reset_sample_data(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<ApiResponse<()>>> {
    let identity = caller.require(AUTH_HEADER_REQUIRED)?;
    let created = sample_data::replace_with_sample_data(&state.db, identity, time::today()).await?;

    Ok(Json(ApiResponse::message(format!(
        "Sample data created successfully with {} appliances covering all warranty statuses",
        created
    ))))
}
