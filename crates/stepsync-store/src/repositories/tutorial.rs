//! Tutorial repository.

use rusqlite::{Connection, Row, params};
use stepsync_core::ids;
use stepsync_core::models::{DanceTutorial, Difficulty};

use crate::errors::{Result, StoreError};
use crate::repositories::{decode_tags, encode_tags};

/// Options for creating a tutorial.
pub struct CreateTutorialOptions<'a> {
    /// Title.
    pub title: &'a str,
    /// Longer description.
    pub description: &'a str,
    /// Video URL.
    pub video_url: &'a str,
    /// Style name (normalized to lowercase on insert).
    pub dance_style: &'a str,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Length in seconds.
    pub duration: i64,
    /// Thumbnail URL.
    pub thumbnail_url: &'a str,
    /// Instructor display name.
    pub instructor: &'a str,
    /// Free-form tags.
    pub tags: &'a [String],
}

/// Options for listing tutorials.
#[derive(Default)]
pub struct ListTutorialsOptions<'a> {
    /// Filter by style (`all` and `None` both mean no filter).
    pub style: Option<&'a str>,
    /// Filter by difficulty.
    pub difficulty: Option<Difficulty>,
    /// Case-insensitive substring over title, description, instructor.
    pub search: Option<&'a str>,
}

/// Tutorial repository — stateless, every method takes `&Connection`.
pub struct TutorialRepo;

impl TutorialRepo {
    /// Insert a new tutorial with a generated ID.
    pub fn create(conn: &Connection, opts: &CreateTutorialOptions<'_>) -> Result<DanceTutorial> {
        let tutorial = DanceTutorial {
            tutorial_id: ids::tutorial_id(),
            title: opts.title.to_owned(),
            description: opts.description.to_owned(),
            video_url: opts.video_url.to_owned(),
            dance_style: opts.dance_style.to_lowercase(),
            difficulty: opts.difficulty,
            duration: opts.duration,
            thumbnail_url: opts.thumbnail_url.to_owned(),
            instructor: opts.instructor.to_owned(),
            tags: opts.tags.to_vec(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let _ = conn.execute(
            "INSERT INTO tutorials (tutorial_id, title, description, video_url, dance_style,
                                    difficulty, duration, thumbnail_url, instructor, tags, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                tutorial.tutorial_id,
                tutorial.title,
                tutorial.description,
                tutorial.video_url,
                tutorial.dance_style,
                tutorial.difficulty.as_str(),
                tutorial.duration,
                tutorial.thumbnail_url,
                tutorial.instructor,
                encode_tags(&tutorial.tags),
                tutorial.created_at,
            ],
        )?;
        Ok(tutorial)
    }

    /// List tutorials, newest first, with optional filters.
    pub fn list(conn: &Connection, opts: &ListTutorialsOptions<'_>) -> Result<Vec<DanceTutorial>> {
        let mut sql = String::from(
            "SELECT tutorial_id, title, description, video_url, dance_style, difficulty,
                    duration, thumbnail_url, instructor, tags, created_at
             FROM tutorials",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut bind: Vec<String> = Vec::new();

        if let Some(style) = opts.style.filter(|s| *s != "all") {
            clauses.push("dance_style = ?");
            bind.push(style.to_lowercase());
        }
        if let Some(difficulty) = opts.difficulty {
            clauses.push("difficulty = ?");
            bind.push(difficulty.as_str().to_owned());
        }
        if let Some(search) = opts.search {
            clauses.push(
                "(LOWER(title) LIKE '%' || ? || '%'
                  OR LOWER(description) LIKE '%' || ? || '%'
                  OR LOWER(instructor) LIKE '%' || ? || '%')",
            );
            let needle = search.to_lowercase();
            bind.push(needle.clone());
            bind.push(needle.clone());
            bind.push(needle);
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(bind.iter()), map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(TutorialRow::into_model).collect()
    }
}

/// Raw row before enum conversion.
struct TutorialRow {
    tutorial_id: String,
    title: String,
    description: String,
    video_url: String,
    dance_style: String,
    difficulty: String,
    duration: i64,
    thumbnail_url: String,
    instructor: String,
    tags: String,
    created_at: String,
}

impl TutorialRow {
    fn into_model(self) -> Result<DanceTutorial> {
        let difficulty = Difficulty::parse(&self.difficulty).ok_or_else(|| {
            StoreError::CorruptRow(format!(
                "tutorial {} has unknown difficulty '{}'",
                self.tutorial_id, self.difficulty
            ))
        })?;
        Ok(DanceTutorial {
            tutorial_id: self.tutorial_id,
            title: self.title,
            description: self.description,
            video_url: self.video_url,
            dance_style: self.dance_style,
            difficulty,
            duration: self.duration,
            thumbnail_url: self.thumbnail_url,
            instructor: self.instructor,
            tags: decode_tags(&self.tags),
            created_at: self.created_at,
        })
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<TutorialRow> {
    Ok(TutorialRow {
        tutorial_id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        video_url: row.get(3)?,
        dance_style: row.get(4)?,
        difficulty: row.get(5)?,
        duration: row.get(6)?,
        thumbnail_url: row.get(7)?,
        instructor: row.get(8)?,
        tags: row.get(9)?,
        created_at: row.get(10)?,
    })
}
