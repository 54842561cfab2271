//! User repository
//!
//! Authentication is handled elsewhere; this only maps an email to the
//! numeric id that scopes every task and category.

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use super::{DbPool, conn, parse_datetime};
use crate::Result;
use crate::model::UserId;

/// A user
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User repository
#[derive(Clone)]
pub struct UserRepo {
    pool: DbPool,
}

impl UserRepo {
    /// Create a new user repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Find or create a user by email
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn find_or_create(&self, email: &str) -> Result<User> {
        if let Some(user) = self.find_by_email(email)? {
            return Ok(user);
        }

        let conn = conn(&self.pool)?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO users (email, created_at) VALUES (?1, ?2)",
            rusqlite::params![email, now.to_rfc3339()],
        )?;

        tracing::info!(email, "created user");

        Ok(User {
            id: conn.last_insert_rowid(),
            email: email.to_string(),
            name: None,
            created_at: now,
        })
    }

    /// Find a user by email (returns None if not found)
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = conn(&self.pool)?;

        let user = conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE email = ?1",
                [email],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        name: row.get(2)?,
                        created_at: parse_datetime(&row.get::<_, String>(3)?),
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    /// Set the user's display name
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn set_name(&self, id: UserId, name: Option<&str>) -> Result<()> {
        let conn = conn(&self.pool)?;
        conn.execute(
            "UPDATE users SET name = ?1 WHERE id = ?2",
            rusqlite::params![name, id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory;

    fn setup() -> UserRepo {
        let pool = init_memory().unwrap();
        UserRepo::new(pool)
    }

    #[test]
    fn test_find_or_create_user() {
        let repo = setup();

        let user = repo.find_or_create("ana@example.com").unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert!(user.name.is_none());

        // Should return same user
        let user2 = repo.find_or_create("ana@example.com").unwrap();
        assert_eq!(user.id, user2.id);

        let other = repo.find_or_create("luis@example.com").unwrap();
        assert_ne!(user.id, other.id);
    }

    #[test]
    fn test_set_name() {
        let repo = setup();

        let user = repo.find_or_create("ana@example.com").unwrap();
        repo.set_name(user.id, Some("Ana")).unwrap();

        let user = repo.find_by_email("ana@example.com").unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_find_missing() {
        let repo = setup();
        assert!(repo.find_by_email("nadie@example.com").unwrap().is_none());
    }
}
