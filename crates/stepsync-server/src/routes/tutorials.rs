//! `/api/tutorials` handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use stepsync_core::models::Difficulty;
use stepsync_store::repositories::{CreateTutorialOptions, ListTutorialsOptions};

use super::ApiError;
use crate::server::AppState;

/// Query parameters for `GET /api/tutorials`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialQuery {
    style: Option<String>,
    difficulty: Option<Difficulty>,
    search: Option<String>,
}

/// Body for `POST /api/tutorials`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTutorialBody {
    title: String,
    description: String,
    video_url: String,
    dance_style: String,
    difficulty: Difficulty,
    duration: i64,
    thumbnail_url: String,
    instructor: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// `GET /api/tutorials?style=&difficulty=&search=`
pub async fn list_tutorials(
    State(state): State<AppState>,
    Query(query): Query<TutorialQuery>,
) -> Result<Response, ApiError> {
    let tutorials = state.store.list_tutorials(&ListTutorialsOptions {
        style: query.style.as_deref(),
        difficulty: query.difficulty,
        search: query.search.as_deref(),
    })?;
    Ok(Json(tutorials).into_response())
}

/// `POST /api/tutorials`
pub async fn create_tutorial(
    State(state): State<AppState>,
    Json(body): Json<CreateTutorialBody>,
) -> Result<Response, ApiError> {
    let tutorial = state.store.create_tutorial(&CreateTutorialOptions {
        title: &body.title,
        description: &body.description,
        video_url: &body.video_url,
        dance_style: &body.dance_style,
        difficulty: body.difficulty,
        duration: body.duration,
        thumbnail_url: &body.thumbnail_url,
        instructor: &body.instructor,
        tags: &body.tags,
    })?;
    Ok((StatusCode::CREATED, Json(tutorial)).into_response())
}
