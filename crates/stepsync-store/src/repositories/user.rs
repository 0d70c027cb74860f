//! User repository.
//!
//! `userId` is a caller-supplied stable key, so create is an upsert:
//! signing in again with a changed username or avatar updates the row.

use rusqlite::{Connection, OptionalExtension, Row, params};
use stepsync_core::models::User;

use crate::errors::Result;

/// User repository — stateless, every method takes `&Connection`.
pub struct UserRepo;

impl UserRepo {
    /// Create or update a user keyed by `user_id`.
    pub fn upsert(conn: &Connection, user: &User) -> Result<User> {
        let _ = conn.execute(
            "INSERT INTO users (user_id, username, profile_pic_url, wallet_address)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id) DO UPDATE SET
                 username = excluded.username,
                 profile_pic_url = excluded.profile_pic_url,
                 wallet_address = excluded.wallet_address",
            params![
                user.user_id,
                user.username,
                user.profile_pic_url,
                user.wallet_address
            ],
        )?;
        Ok(user.clone())
    }

    /// Fetch a single user by ID.
    pub fn get(conn: &Connection, user_id: &str) -> Result<Option<User>> {
        let user = conn
            .query_row(
                "SELECT user_id, username, profile_pic_url, wallet_address
                 FROM users WHERE user_id = ?1",
                [user_id],
                map_row,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users ordered by username (for finding practice partners).
    pub fn list(conn: &Connection) -> Result<Vec<User>> {
        let mut stmt = conn.prepare(
            "SELECT user_id, username, profile_pic_url, wallet_address
             FROM users ORDER BY username ASC",
        )?;
        let users = stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get(0)?,
        username: row.get(1)?,
        profile_pic_url: row.get(2)?,
        wallet_address: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ConnectionConfig, new_in_memory};
    use crate::migrations::run_migrations;

    fn pool() -> crate::connection::ConnectionPool {
        let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
        {
            let conn = pool.get().unwrap();
            let _ = run_migrations(&conn).unwrap();
        }
        pool
    }

    fn user(id: &str, name: &str) -> User {
        User {
            user_id: id.into(),
            username: name.into(),
            profile_pic_url: format!("https://pics.example/{name}.png"),
            wallet_address: None,
        }
    }

    #[test]
    fn upsert_and_get() {
        let pool = pool();
        let conn = pool.get().unwrap();
        let _ = UserRepo::upsert(&conn, &user("fid_1", "ada")).unwrap();

        let found = UserRepo::get(&conn, "fid_1").unwrap().unwrap();
        assert_eq!(found.username, "ada");
    }

    #[test]
    fn get_unknown_returns_none() {
        let pool = pool();
        let conn = pool.get().unwrap();
        assert!(UserRepo::get(&conn, "fid_404").unwrap().is_none());
    }

    #[test]
    fn upsert_updates_existing_row() {
        let pool = pool();
        let conn = pool.get().unwrap();
        let _ = UserRepo::upsert(&conn, &user("fid_1", "ada")).unwrap();

        let mut updated = user("fid_1", "ada_l");
        updated.wallet_address = Some("0xabc".into());
        let _ = UserRepo::upsert(&conn, &updated).unwrap();

        let found = UserRepo::get(&conn, "fid_1").unwrap().unwrap();
        assert_eq!(found.username, "ada_l");
        assert_eq!(found.wallet_address.as_deref(), Some("0xabc"));
        assert_eq!(UserRepo::list(&conn).unwrap().len(), 1);
    }

    #[test]
    fn list_orders_by_username() {
        let pool = pool();
        let conn = pool.get().unwrap();
        let _ = UserRepo::upsert(&conn, &user("fid_2", "zoe")).unwrap();
        let _ = UserRepo::upsert(&conn, &user("fid_1", "ada")).unwrap();

        let users = UserRepo::list(&conn).unwrap();
        assert_eq!(users[0].username, "ada");
        assert_eq!(users[1].username, "zoe");
    }
}
