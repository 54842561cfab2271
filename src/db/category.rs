//! Category repository for CRUD operations

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};

use super::{DbPool, conn};
use crate::model::{Category, CategoryId, CategoryPatch, DEFAULT_CATEGORY_COLOR, NewCategory, UserId};
use crate::{Error, Result};

/// Category repository
#[derive(Clone)]
pub struct CategoryRepo {
    pool: DbPool,
}

impl CategoryRepo {
    /// Create a new category repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List a user's categories by name
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn list(&self, user_id: UserId) -> Result<Vec<Category>> {
        let conn = conn(&self.pool)?;
        let mut stmt =
            conn.prepare("SELECT id, name, color FROM categories WHERE user_id = ?1 ORDER BY name")?;

        let categories = stmt
            .query_map([user_id], row_to_category)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(categories)
    }

    /// Get one of the user's categories
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category does not exist or belongs to someone else
    pub fn get(&self, user_id: UserId, id: CategoryId) -> Result<Category> {
        let conn = conn(&self.pool)?;
        find(&conn, user_id, id)?.ok_or_else(|| Error::NotFound(format!("category {id}")))
    }

    /// Create a category
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name and `Conflict` when the user already
    /// has a category with that name (compared case-insensitively)
    pub fn create(&self, user_id: UserId, new: &NewCategory) -> Result<Category> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("category name is required".to_string()));
        }

        let conn = conn(&self.pool)?;
        ensure_unique(&conn, user_id, name, None)?;

        let color = new
            .color
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY_COLOR);

        conn.execute(
            "INSERT INTO categories (user_id, name, color, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![user_id, name, color, Utc::now().to_rfc3339()],
        )?;

        let id = conn.last_insert_rowid();
        tracing::debug!(category_id = id, user_id, name, "created category");

        Ok(Category {
            id,
            name: name.to_string(),
            color: color.to_string(),
        })
    }

    /// Rename or recolour a category
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Validation` or `Conflict` as for [`Self::create`]
    pub fn update(&self, user_id: UserId, id: CategoryId, patch: &CategoryPatch) -> Result<Category> {
        let conn = conn(&self.pool)?;
        let mut category =
            find(&conn, user_id, id)?.ok_or_else(|| Error::NotFound(format!("category {id}")))?;

        if let Some(name) = &patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::Validation("category name is required".to_string()));
            }
            if name != category.name {
                ensure_unique(&conn, user_id, name, Some(id))?;
            }
            category.name = name.to_string();
        }
        if let Some(color) = &patch.color {
            category.color.clone_from(color);
        }

        conn.execute(
            "UPDATE categories SET name = ?1, color = ?2 WHERE id = ?3 AND user_id = ?4",
            rusqlite::params![category.name, category.color, id, user_id],
        )?;

        Ok(category)
    }

    /// Delete a category, detaching it from the user's tasks first
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category does not exist or belongs to someone else
    pub fn delete(&self, user_id: UserId, id: CategoryId) -> Result<()> {
        let mut conn = conn(&self.pool)?;
        let tx = conn.transaction()?;

        let detached = tx.execute(
            "UPDATE tasks SET category_id = NULL WHERE category_id = ?1 AND user_id = ?2",
            rusqlite::params![id, user_id],
        )?;
        let deleted = tx.execute(
            "DELETE FROM categories WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, user_id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("category {id}")));
        }

        tx.commit()?;
        tracing::debug!(category_id = id, user_id, detached, "deleted category");
        Ok(())
    }
}

fn find(conn: &Connection, user_id: UserId, id: CategoryId) -> Result<Option<Category>> {
    let category = conn
        .query_row(
            "SELECT id, name, color FROM categories WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, user_id],
            row_to_category,
        )
        .optional()?;
    Ok(category)
}

/// Names are compared case-insensitively so voice lookups stay unambiguous
fn ensure_unique(
    conn: &Connection,
    user_id: UserId,
    name: &str,
    except: Option<CategoryId>,
) -> Result<()> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories WHERE user_id = ?1")?;
    let wanted = name.to_lowercase();

    let rows = stmt.query_map([user_id], |row| {
        Ok((row.get::<_, CategoryId>(0)?, row.get::<_, String>(1)?))
    })?;

    for row in rows {
        let (id, existing) = row?;
        if Some(id) != except && existing.to_lowercase() == wanted {
            return Err(Error::Conflict(format!("category already exists: {name}")));
        }
    }

    Ok(())
}

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
    })
}
