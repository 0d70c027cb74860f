//! REST surface — thin JSON handlers over the store.
//!
//! Handler failures map to `{"error": "..."}` bodies with an appropriate
//! status, the shape the mobile client already expects.

pub mod ai_feedback;
pub mod challenges;
pub mod practice_sessions;
pub mod submissions;
pub mod tutorials;
pub mod users;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use serde_json::json;
use stepsync_store::StoreError;

use crate::server::AppState;

/// Build the `/api` router.
pub fn api_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/users", get(users::get_users).post(users::create_user))
        .route(
            "/tutorials",
            get(tutorials::list_tutorials).post(tutorials::create_tutorial),
        )
        .route(
            "/challenges",
            get(challenges::list_challenges).post(challenges::create_challenge),
        )
        .route(
            "/submissions",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route(
            "/practice-sessions",
            get(practice_sessions::list_sessions).post(practice_sessions::create_session),
        )
        .route(
            "/practice-sessions/{session_id}/end",
            put(practice_sessions::end_session),
        )
        .route(
            "/ai-feedback",
            get(ai_feedback::list_feedback).post(ai_feedback::create_feedback),
        )
}

/// An error response: status plus `{"error": "..."}`.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::UserNotFound(_)
            | StoreError::SessionNotFound(_)
            | StoreError::ChallengeNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn not_found_maps_to_404_with_error_body() {
        let err: ApiError = StoreError::SessionNotFound("sess_1".into()).into();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(parsed["error"].as_str().unwrap().contains("sess_1"));
    }

    #[test]
    fn internal_errors_map_to_500() {
        let err: ApiError = StoreError::Migration {
            message: "boom".into(),
        }
        .into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
