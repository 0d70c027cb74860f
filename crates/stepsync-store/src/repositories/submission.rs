//! Challenge submission repository.

use rusqlite::{Connection, Row, params};
use stepsync_core::ids;
use stepsync_core::models::Submission;

use crate::errors::Result;

/// Options for creating a submission.
pub struct CreateSubmissionOptions<'a> {
    /// Challenge being entered.
    pub challenge_id: &'a str,
    /// Submitting user.
    pub user_id: &'a str,
    /// Video URL.
    pub video_url: &'a str,
    /// Optional title.
    pub title: Option<&'a str>,
    /// Optional description.
    pub description: Option<&'a str>,
}

/// Options for listing submissions.
#[derive(Default)]
pub struct ListSubmissionsOptions<'a> {
    /// Filter by challenge.
    pub challenge_id: Option<&'a str>,
    /// Filter by submitting user.
    pub user_id: Option<&'a str>,
}

/// Submission repository — stateless, every method takes `&Connection`.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a new submission with a generated ID and zeroed counters.
    pub fn create(conn: &Connection, opts: &CreateSubmissionOptions<'_>) -> Result<Submission> {
        let submission = Submission {
            submission_id: ids::submission_id(),
            challenge_id: opts.challenge_id.to_owned(),
            user_id: opts.user_id.to_owned(),
            video_url: opts.video_url.to_owned(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            likes: 0,
            views: 0,
            title: opts.title.map(str::to_owned),
            description: opts.description.map(str::to_owned),
        };
        let _ = conn.execute(
            "INSERT INTO submissions (submission_id, challenge_id, user_id, video_url,
                                      timestamp, likes, views, title, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                submission.submission_id,
                submission.challenge_id,
                submission.user_id,
                submission.video_url,
                submission.timestamp,
                submission.likes,
                submission.views,
                submission.title,
                submission.description,
            ],
        )?;
        Ok(submission)
    }

    /// List submissions, newest first, with optional filters.
    pub fn list(conn: &Connection, opts: &ListSubmissionsOptions<'_>) -> Result<Vec<Submission>> {
        let mut sql = String::from(
            "SELECT submission_id, challenge_id, user_id, video_url, timestamp,
                    likes, views, title, description
             FROM submissions",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut bind: Vec<String> = Vec::new();

        if let Some(challenge_id) = opts.challenge_id {
            clauses.push("challenge_id = ?");
            bind.push(challenge_id.to_owned());
        }
        if let Some(user_id) = opts.user_id {
            clauses.push("user_id = ?");
            bind.push(user_id.to_owned());
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY timestamp DESC");

        let mut stmt = conn.prepare(&sql)?;
        let submissions = stmt
            .query_map(rusqlite::params_from_iter(bind.iter()), map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(submissions)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Submission> {
    Ok(Submission {
        submission_id: row.get(0)?,
        challenge_id: row.get(1)?,
        user_id: row.get(2)?,
        video_url: row.get(3)?,
        timestamp: row.get(4)?,
        likes: row.get(5)?,
        views: row.get(6)?,
        title: row.get(7)?,
        description: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ConnectionConfig, new_in_memory};
    use crate::migrations::run_migrations;
    use crate::repositories::{ChallengeRepo, CreateChallengeOptions, UserRepo};
    use stepsync_core::models::{ChallengeDifficulty, User};

    fn pool() -> crate::connection::ConnectionPool {
        let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
        {
            let conn = pool.get().unwrap();
            let _ = run_migrations(&conn).unwrap();
        }
        pool
    }

    fn seed_user(conn: &Connection, id: &str) {
        let _ = UserRepo::upsert(
            conn,
            &User {
                user_id: id.into(),
                username: id.into(),
                profile_pic_url: "https://pics.example/u.png".into(),
                wallet_address: None,
            },
        )
        .unwrap();
    }

    fn seed_challenge(conn: &Connection, creator: &str) -> String {
        ChallengeRepo::create(
            conn,
            &CreateChallengeOptions {
                title: "Freestyle Friday",
                description: "",
                start_date: "2026-09-01T00:00:00Z",
                end_date: "2026-09-14T00:00:00Z",
                creator_id: creator,
                prize: None,
                difficulty: ChallengeDifficulty::Easy,
                tags: &[],
            },
        )
        .unwrap()
        .challenge_id
    }

    #[test]
    fn create_zeroes_counters() {
        let pool = pool();
        let conn = pool.get().unwrap();
        seed_user(&conn, "fid_1");
        let challenge_id = seed_challenge(&conn, "fid_1");

        let sub = SubmissionRepo::create(
            &conn,
            &CreateSubmissionOptions {
                challenge_id: &challenge_id,
                user_id: "fid_1",
                video_url: "https://videos.example/entry.mp4",
                title: Some("my entry"),
                description: None,
            },
        )
        .unwrap();
        assert!(sub.submission_id.starts_with("sub_"));
        assert_eq!(sub.likes, 0);
        assert_eq!(sub.views, 0);
    }

    #[test]
    fn filters_by_challenge_and_user() {
        let pool = pool();
        let conn = pool.get().unwrap();
        seed_user(&conn, "fid_1");
        seed_user(&conn, "fid_2");
        let chal_a = seed_challenge(&conn, "fid_1");
        let chal_b = seed_challenge(&conn, "fid_1");

        for (chal, user) in [(&chal_a, "fid_1"), (&chal_a, "fid_2"), (&chal_b, "fid_1")] {
            let _ = SubmissionRepo::create(
                &conn,
                &CreateSubmissionOptions {
                    challenge_id: chal,
                    user_id: user,
                    video_url: "https://videos.example/entry.mp4",
                    title: None,
                    description: None,
                },
            )
            .unwrap();
        }

        let by_challenge = SubmissionRepo::list(
            &conn,
            &ListSubmissionsOptions {
                challenge_id: Some(&chal_a),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(by_challenge.len(), 2);

        let by_user = SubmissionRepo::list(
            &conn,
            &ListSubmissionsOptions {
                user_id: Some("fid_1"),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(by_user.len(), 2);

        let both = SubmissionRepo::list(
            &conn,
            &ListSubmissionsOptions {
                challenge_id: Some(&chal_b),
                user_id: Some("fid_1"),
            },
        )
        .unwrap();
        assert_eq!(both.len(), 1);
    }

    #[test]
    fn list_without_filters_returns_all() {
        let pool = pool();
        let conn = pool.get().unwrap();
        seed_user(&conn, "fid_1");
        let challenge_id = seed_challenge(&conn, "fid_1");
        let _ = SubmissionRepo::create(
            &conn,
            &CreateSubmissionOptions {
                challenge_id: &challenge_id,
                user_id: "fid_1",
                video_url: "https://videos.example/entry.mp4",
                title: None,
                description: None,
            },
        )
        .unwrap();

        let all = SubmissionRepo::list(&conn, &ListSubmissionsOptions::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].title.is_none());
    }
}
