//! `/api/submissions` handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use stepsync_store::repositories::{CreateSubmissionOptions, ListSubmissionsOptions};

use super::ApiError;
use crate::server::AppState;

/// Query parameters for `GET /api/submissions`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionQuery {
    challenge_id: Option<String>,
    user_id: Option<String>,
}

/// Body for `POST /api/submissions`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionBody {
    challenge_id: String,
    user_id: String,
    video_url: String,
    title: Option<String>,
    description: Option<String>,
}

/// `GET /api/submissions?challengeId=&userId=`
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<SubmissionQuery>,
) -> Result<Response, ApiError> {
    let submissions = state.store.list_submissions(&ListSubmissionsOptions {
        challenge_id: query.challenge_id.as_deref(),
        user_id: query.user_id.as_deref(),
    })?;
    Ok(Json(submissions).into_response())
}

/// `POST /api/submissions`
pub async fn create_submission(
    State(state): State<AppState>,
    Json(body): Json<CreateSubmissionBody>,
) -> Result<Response, ApiError> {
    if state.store.get_challenge(&body.challenge_id)?.is_none() {
        return Err(ApiError::not_found(format!(
            "challenge not found: {}",
            body.challenge_id
        )));
    }
    let submission = state.store.create_submission(&CreateSubmissionOptions {
        challenge_id: &body.challenge_id,
        user_id: &body.user_id,
        video_url: &body.video_url,
        title: body.title.as_deref(),
        description: body.description.as_deref(),
    })?;
    Ok((StatusCode::CREATED, Json(submission)).into_response())
}
