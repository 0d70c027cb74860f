//! `/api/ai-feedback` handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::ApiError;
use crate::feedback::AnalysisRequest;
use crate::server::AppState;

/// Query parameters for `GET /api/ai-feedback`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackQuery {
    session_id: String,
}

/// Body for `POST /api/ai-feedback`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackBody {
    session_id: String,
    user_id: String,
    video_description: String,
    #[serde(default)]
    is_premium: bool,
}

/// `GET /api/ai-feedback?sessionId=` — feedback for one session.
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(query): Query<FeedbackQuery>,
) -> Result<Response, ApiError> {
    Ok(Json(state.store.list_feedback(&query.session_id)?).into_response())
}

/// `POST /api/ai-feedback` — analyze (fallback on failure), persist,
/// return the stored record.
pub async fn create_feedback(
    State(state): State<AppState>,
    Json(body): Json<CreateFeedbackBody>,
) -> Result<Response, ApiError> {
    if state.store.get_session(&body.session_id)?.is_none() {
        return Err(ApiError::not_found(format!(
            "practice session not found: {}",
            body.session_id
        )));
    }
    if state.store.get_user(&body.user_id)?.is_none() {
        return Err(ApiError::not_found(format!(
            "user not found: {}",
            body.user_id
        )));
    }

    let feedback = state
        .feedback
        .generate(
            &body.session_id,
            &body.user_id,
            &AnalysisRequest {
                video_description: body.video_description,
                is_premium: body.is_premium,
            },
        )
        .await;
    state.store.insert_feedback(&feedback)?;
    Ok((StatusCode::CREATED, Json(feedback)).into_response())
}
