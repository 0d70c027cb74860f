//! Practice session repository.
//!
//! A session's `session_id` is the room ID the sync layer broadcasts under,
//! so these rows are the durable record behind live rooms.

use rusqlite::{Connection, OptionalExtension, Row, params};
use stepsync_core::ids;
use stepsync_core::models::{PracticeSession, SessionType};

use crate::errors::{Result, StoreError};

/// Options for creating a practice session.
pub struct CreatePracticeSessionOptions<'a> {
    /// First participant.
    pub user_id1: &'a str,
    /// Optional second participant.
    pub user_id2: Option<&'a str>,
    /// Optional tutorial being practiced.
    pub tutorial_id: Option<&'a str>,
    /// Session format.
    pub session_type: SessionType,
}

/// Options for listing practice sessions.
#[derive(Default)]
pub struct ListSessionsOptions<'a> {
    /// Match sessions where this user occupies either seat.
    pub user_id: Option<&'a str>,
    /// Filter by live status.
    pub is_live: Option<bool>,
}

/// Practice session repository — stateless, every method takes `&Connection`.
pub struct PracticeSessionRepo;

impl PracticeSessionRepo {
    /// Insert a new session, live from the start.
    pub fn create(
        conn: &Connection,
        opts: &CreatePracticeSessionOptions<'_>,
    ) -> Result<PracticeSession> {
        let session = PracticeSession {
            session_id: ids::session_id(),
            user_id1: opts.user_id1.to_owned(),
            user_id2: opts.user_id2.map(str::to_owned),
            tutorial_id: opts.tutorial_id.map(str::to_owned),
            start_time: chrono::Utc::now().to_rfc3339(),
            end_time: None,
            is_live: true,
            session_type: opts.session_type,
            recording_url: None,
        };
        let _ = conn.execute(
            "INSERT INTO practice_sessions (session_id, user_id1, user_id2, tutorial_id,
                                            start_time, end_time, is_live, session_type, recording_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                session.session_id,
                session.user_id1,
                session.user_id2,
                session.tutorial_id,
                session.start_time,
                session.end_time,
                i64::from(session.is_live),
                session.session_type.as_str(),
                session.recording_url,
            ],
        )?;
        Ok(session)
    }

    /// Fetch a single session by ID.
    pub fn get(conn: &Connection, session_id: &str) -> Result<Option<PracticeSession>> {
        let row = conn
            .query_row(
                "SELECT session_id, user_id1, user_id2, tutorial_id, start_time,
                        end_time, is_live, session_type, recording_url
                 FROM practice_sessions WHERE session_id = ?1",
                [session_id],
                map_row,
            )
            .optional()?;
        row.map(SessionRow::into_model).transpose()
    }

    /// List sessions, newest first, with optional filters.
    pub fn list(conn: &Connection, opts: &ListSessionsOptions<'_>) -> Result<Vec<PracticeSession>> {
        let mut sql = String::from(
            "SELECT session_id, user_id1, user_id2, tutorial_id, start_time,
                    end_time, is_live, session_type, recording_url
             FROM practice_sessions",
        );
        let mut clauses: Vec<String> = Vec::new();
        let mut bind: Vec<String> = Vec::new();

        if let Some(user_id) = opts.user_id {
            clauses.push("(user_id1 = ? OR user_id2 = ?)".to_owned());
            bind.push(user_id.to_owned());
            bind.push(user_id.to_owned());
        }
        if let Some(is_live) = opts.is_live {
            clauses.push(format!("is_live = {}", i64::from(is_live)));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY start_time DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(bind.iter()), map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(SessionRow::into_model).collect()
    }

    /// End a live session: stamp the end time, clear the live flag, and
    /// attach a recording URL if one was captured.
    pub fn end(
        conn: &Connection,
        session_id: &str,
        recording_url: Option<&str>,
    ) -> Result<PracticeSession> {
        let changed = conn.execute(
            "UPDATE practice_sessions
             SET end_time = ?1, is_live = 0,
                 recording_url = COALESCE(?2, recording_url)
             WHERE session_id = ?3",
            params![chrono::Utc::now().to_rfc3339(), recording_url, session_id],
        )?;
        if changed == 0 {
            return Err(StoreError::SessionNotFound(session_id.to_owned()));
        }
        Self::get(conn, session_id)?.ok_or_else(|| StoreError::SessionNotFound(session_id.to_owned()))
    }
}

struct SessionRow {
    session_id: String,
    user_id1: String,
    user_id2: Option<String>,
    tutorial_id: Option<String>,
    start_time: String,
    end_time: Option<String>,
    is_live: i64,
    session_type: String,
    recording_url: Option<String>,
}

impl SessionRow {
    fn into_model(self) -> Result<PracticeSession> {
        let session_type = SessionType::parse(&self.session_type).ok_or_else(|| {
            StoreError::CorruptRow(format!(
                "session {} has unknown type '{}'",
                self.session_id, self.session_type
            ))
        })?;
        Ok(PracticeSession {
            session_id: self.session_id,
            user_id1: self.user_id1,
            user_id2: self.user_id2,
            tutorial_id: self.tutorial_id,
            start_time: self.start_time,
            end_time: self.end_time,
            is_live: self.is_live != 0,
            session_type,
            recording_url: self.recording_url,
        })
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok(SessionRow {
        session_id: row.get(0)?,
        user_id1: row.get(1)?,
        user_id2: row.get(2)?,
        tutorial_id: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        is_live: row.get(6)?,
        session_type: row.get(7)?,
        recording_url: row.get(8)?,
    })
}
