//! `/api/practice-sessions` handlers.
//!
//! A created session's `sessionId` is the `roomId` clients then join over
//! the WebSocket sync layer.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use stepsync_core::models::SessionType;
use stepsync_store::repositories::{CreatePracticeSessionOptions, ListSessionsOptions};

use super::ApiError;
use crate::server::AppState;

/// Query parameters for `GET /api/practice-sessions`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    user_id: Option<String>,
    is_live: Option<bool>,
}

/// Body for `POST /api/practice-sessions`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionBody {
    user_id1: String,
    user_id2: Option<String>,
    tutorial_id: Option<String>,
    session_type: SessionType,
}

/// Body for `PUT /api/practice-sessions/{id}/end`.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionBody {
    recording_url: Option<String>,
}

/// `GET /api/practice-sessions?userId=&isLive=`
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Response, ApiError> {
    let sessions = state.store.list_sessions(&ListSessionsOptions {
        user_id: query.user_id.as_deref(),
        is_live: query.is_live,
    })?;
    Ok(Json(sessions).into_response())
}

/// `POST /api/practice-sessions`
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionBody>,
) -> Result<Response, ApiError> {
    if state.store.get_user(&body.user_id1)?.is_none() {
        return Err(ApiError::not_found(format!(
            "user not found: {}",
            body.user_id1
        )));
    }
    let session = state.store.create_session(&CreatePracticeSessionOptions {
        user_id1: &body.user_id1,
        user_id2: body.user_id2.as_deref(),
        tutorial_id: body.tutorial_id.as_deref(),
        session_type: body.session_type,
    })?;
    Ok((StatusCode::CREATED, Json(session)).into_response())
}

/// `PUT /api/practice-sessions/{id}/end`
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Option<Json<EndSessionBody>>,
) -> Result<Response, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let session = state
        .store
        .end_session(&session_id, body.recording_url.as_deref())?;
    Ok(Json(session).into_response())
}
