//! `/api/users` handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use stepsync_core::models::User;

use super::ApiError;
use crate::server::AppState;

/// Query parameters for `GET /api/users`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    user_id: Option<String>,
}

/// `GET /api/users` — one user by `?userId=`, or all users.
pub async fn get_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Response, ApiError> {
    match query.user_id {
        Some(user_id) => {
            let user = state
                .store
                .get_user(&user_id)?
                .ok_or_else(|| ApiError::not_found(format!("user not found: {user_id}")))?;
            Ok(Json(user).into_response())
        }
        None => Ok(Json(state.store.list_users()?).into_response()),
    }
}

/// `POST /api/users` — upsert keyed on `userId`.
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<Response, ApiError> {
    let stored = state.store.upsert_user(&user)?;
    Ok((StatusCode::CREATED, Json(stored)).into_response())
}
