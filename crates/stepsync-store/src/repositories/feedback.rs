//! AI feedback repository.
//!
//! Feedback records arrive fully formed from the analysis service (which
//! assigns the ID, scores, and timestamp), so insert takes the whole record.

use rusqlite::{Connection, Row, params};
use stepsync_core::models::AiFeedback;

use crate::errors::Result;
use crate::repositories::{decode_tags, encode_tags};

/// Feedback repository — stateless, every method takes `&Connection`.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Persist a feedback record.
    pub fn insert(conn: &Connection, feedback: &AiFeedback) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO ai_feedback (feedback_id, session_id, user_id, overall_score,
                                      rhythm_score, form_score, energy_score, suggestions,
                                      timestamp, is_premium)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                feedback.feedback_id,
                feedback.session_id,
                feedback.user_id,
                feedback.overall_score,
                feedback.rhythm_score,
                feedback.form_score,
                feedback.energy_score,
                encode_tags(&feedback.suggestions),
                feedback.timestamp,
                i64::from(feedback.is_premium),
            ],
        )?;
        Ok(())
    }

    /// List all feedback for one practice session, newest first.
    pub fn list_for_session(conn: &Connection, session_id: &str) -> Result<Vec<AiFeedback>> {
        let mut stmt = conn.prepare(
            "SELECT feedback_id, session_id, user_id, overall_score, rhythm_score,
                    form_score, energy_score, suggestions, timestamp, is_premium
             FROM ai_feedback WHERE session_id = ?1
             ORDER BY timestamp DESC",
        )?;
        let feedback = stmt
            .query_map([session_id], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(feedback)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<AiFeedback> {
    let suggestions: String = row.get(7)?;
    let is_premium: i64 = row.get(9)?;
    Ok(AiFeedback {
        feedback_id: row.get(0)?,
        session_id: row.get(1)?,
        user_id: row.get(2)?,
        overall_score: row.get(3)?,
        rhythm_score: row.get(4)?,
        form_score: row.get(5)?,
        energy_score: row.get(6)?,
        suggestions: decode_tags(&suggestions),
        timestamp: row.get(8)?,
        is_premium: is_premium != 0,
    })
}
