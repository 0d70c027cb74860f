//! Stateless record repositories.
//!
//! Every repository method takes `&Connection`, so callers control pooling
//! and transactions. Tags and suggestion lists are stored as JSON text.

pub mod challenge;
pub mod feedback;
pub mod practice_session;
pub mod submission;
pub mod tutorial;
pub mod user;

pub use challenge::{ChallengeRepo, CreateChallengeOptions};
pub use feedback::FeedbackRepo;
pub use practice_session::{CreatePracticeSessionOptions, ListSessionsOptions, PracticeSessionRepo};
pub use submission::{CreateSubmissionOptions, ListSubmissionsOptions, SubmissionRepo};
pub use tutorial::{CreateTutorialOptions, ListTutorialsOptions, TutorialRepo};
pub use user::UserRepo;

/// Decode a JSON-encoded string list column, tolerating legacy/corrupt text.
pub(crate) fn decode_tags(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Encode a string list for storage.
pub(crate) fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}
