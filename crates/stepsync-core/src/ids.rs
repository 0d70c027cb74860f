//! Prefixed ID generation.
//!
//! Every server-assigned identifier is a UUID v7 (time-ordered) with a
//! short type prefix, so an ID is recognizable in logs without context.

use uuid::Uuid;

/// Generate a new connection ID (`conn_...`).
pub fn connection_id() -> String {
    format!("conn_{}", Uuid::now_v7())
}

/// Generate a new practice session ID (`sess_...`).
pub fn session_id() -> String {
    format!("sess_{}", Uuid::now_v7())
}

/// Generate a new tutorial ID (`tut_...`).
pub fn tutorial_id() -> String {
    format!("tut_{}", Uuid::now_v7())
}

/// Generate a new challenge ID (`chal_...`).
pub fn challenge_id() -> String {
    format!("chal_{}", Uuid::now_v7())
}

/// Generate a new submission ID (`sub_...`).
pub fn submission_id() -> String {
    format!("sub_{}", Uuid::now_v7())
}

/// Generate a new AI feedback ID (`fbk_...`).
pub fn feedback_id() -> String {
    format!("fbk_{}", Uuid::now_v7())
}
