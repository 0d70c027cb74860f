//! Challenge repository.

use rusqlite::{Connection, OptionalExtension, Row, params};
use stepsync_core::ids;
use stepsync_core::models::{Challenge, ChallengeDifficulty};

use crate::errors::{Result, StoreError};
use crate::repositories::{decode_tags, encode_tags};

/// Options for creating a challenge.
pub struct CreateChallengeOptions<'a> {
    /// Title.
    pub title: &'a str,
    /// Longer description.
    pub description: &'a str,
    /// RFC 3339 start of the entry window.
    pub start_date: &'a str,
    /// RFC 3339 end of the entry window.
    pub end_date: &'a str,
    /// User who created the challenge.
    pub creator_id: &'a str,
    /// Optional prize description.
    pub prize: Option<&'a str>,
    /// Difficulty tier.
    pub difficulty: ChallengeDifficulty,
    /// Free-form tags.
    pub tags: &'a [String],
}

/// Challenge repository — stateless, every method takes `&Connection`.
pub struct ChallengeRepo;

impl ChallengeRepo {
    /// Insert a new challenge with a generated ID.
    pub fn create(conn: &Connection, opts: &CreateChallengeOptions<'_>) -> Result<Challenge> {
        let challenge = Challenge {
            challenge_id: ids::challenge_id(),
            title: opts.title.to_owned(),
            description: opts.description.to_owned(),
            start_date: opts.start_date.to_owned(),
            end_date: opts.end_date.to_owned(),
            creator_id: opts.creator_id.to_owned(),
            prize: opts.prize.map(str::to_owned),
            difficulty: opts.difficulty,
            tags: opts.tags.to_vec(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let _ = conn.execute(
            "INSERT INTO challenges (challenge_id, title, description, start_date, end_date,
                                     creator_id, prize, difficulty, tags, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                challenge.challenge_id,
                challenge.title,
                challenge.description,
                challenge.start_date,
                challenge.end_date,
                challenge.creator_id,
                challenge.prize,
                challenge.difficulty.as_str(),
                encode_tags(&challenge.tags),
                challenge.created_at,
            ],
        )?;
        Ok(challenge)
    }

    /// Fetch a single challenge by ID.
    pub fn get(conn: &Connection, challenge_id: &str) -> Result<Option<Challenge>> {
        let row = conn
            .query_row(
                "SELECT challenge_id, title, description, start_date, end_date,
                        creator_id, prize, difficulty, tags, created_at
                 FROM challenges WHERE challenge_id = ?1",
                [challenge_id],
                map_row,
            )
            .optional()?;
        row.map(ChallengeRow::into_model).transpose()
    }

    /// List all challenges, newest first.
    pub fn list(conn: &Connection) -> Result<Vec<Challenge>> {
        let mut stmt = conn.prepare(
            "SELECT challenge_id, title, description, start_date, end_date,
                    creator_id, prize, difficulty, tags, created_at
             FROM challenges ORDER BY created_at DESC",
        )?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ChallengeRow::into_model).collect()
    }
}

struct ChallengeRow {
    challenge_id: String,
    title: String,
    description: String,
    start_date: String,
    end_date: String,
    creator_id: String,
    prize: Option<String>,
    difficulty: String,
    tags: String,
    created_at: String,
}

impl ChallengeRow {
    fn into_model(self) -> Result<Challenge> {
        let difficulty = ChallengeDifficulty::parse(&self.difficulty).ok_or_else(|| {
            StoreError::CorruptRow(format!(
                "challenge {} has unknown difficulty '{}'",
                self.challenge_id, self.difficulty
            ))
        })?;
        Ok(Challenge {
            challenge_id: self.challenge_id,
            title: self.title,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            creator_id: self.creator_id,
            prize: self.prize,
            difficulty,
            tags: decode_tags(&self.tags),
            created_at: self.created_at,
        })
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<ChallengeRow> {
    Ok(ChallengeRow {
        challenge_id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        creator_id: row.get(5)?,
        prize: row.get(6)?,
        difficulty: row.get(7)?,
        tags: row.get(8)?,
        created_at: row.get(9)?,
    })
}
