//! `/api/challenges` handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use stepsync_core::models::ChallengeDifficulty;
use stepsync_store::repositories::CreateChallengeOptions;

use super::ApiError;
use crate::server::AppState;

/// Body for `POST /api/challenges`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChallengeBody {
    title: String,
    description: String,
    start_date: String,
    end_date: String,
    creator_id: String,
    prize: Option<String>,
    difficulty: ChallengeDifficulty,
    #[serde(default)]
    tags: Vec<String>,
}

/// `GET /api/challenges` — all challenges, newest first.
pub async fn list_challenges(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(Json(state.store.list_challenges()?).into_response())
}

/// `POST /api/challenges`
pub async fn create_challenge(
    State(state): State<AppState>,
    Json(body): Json<CreateChallengeBody>,
) -> Result<Response, ApiError> {
    // FK demands a real creator; answer 404 instead of a bare constraint error
    if state.store.get_user(&body.creator_id)?.is_none() {
        return Err(ApiError::not_found(format!(
            "user not found: {}",
            body.creator_id
        )));
    }
    let challenge = state.store.create_challenge(&CreateChallengeOptions {
        title: &body.title,
        description: &body.description,
        start_date: &body.start_date,
        end_date: &body.end_date,
        creator_id: &body.creator_id,
        prize: body.prize.as_deref(),
        difficulty: body.difficulty,
        tags: &body.tags,
    })?;
    Ok((StatusCode::CREATED, Json(challenge)).into_response())
}
