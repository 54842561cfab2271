//! Task repository for CRUD operations

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

use super::{DbPool, conn, parse_datetime};
use crate::model::{CategoryFilter, CategoryId, NewTask, Task, TaskId, TaskPatch, UserId};
use crate::{Error, Result};

const TASK_COLUMNS: &str =
    "id, title, description, completed, due_date, category_id, priority, created_at";

/// Most urgent first, newest first within a priority level
const TASK_ORDER: &str = "ORDER BY CASE priority WHEN 'alta' THEN 0 WHEN 'media' THEN 1 ELSE 2 END, created_at DESC, id DESC";

/// Task repository
#[derive(Clone)]
pub struct TaskRepo {
    pool: DbPool,
}

impl TaskRepo {
    /// Create a new task repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List a user's tasks, optionally narrowed by category
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn list(&self, user_id: UserId, filter: CategoryFilter) -> Result<Vec<Task>> {
        let conn = conn(&self.pool)?;

        let (clause, category) = match filter {
            CategoryFilter::All => ("", None),
            CategoryFilter::Uncategorized => ("AND category_id IS NULL", None),
            CategoryFilter::Category(id) => ("AND category_id = ?2", Some(id)),
        };
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 {clause} {TASK_ORDER}");

        let mut stmt = conn.prepare(&sql)?;
        let tasks = match category {
            Some(id) => stmt
                .query_map(rusqlite::params![user_id, id], row_to_task)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map([user_id], row_to_task)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };

        Ok(tasks)
    }

    /// Get one of the user's tasks
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the task does not exist or belongs to someone else
    pub fn get(&self, user_id: UserId, id: TaskId) -> Result<Task> {
        let conn = conn(&self.pool)?;
        find(&conn, user_id, id)?.ok_or_else(|| Error::NotFound(format!("task {id}")))
    }

    /// Create a task
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty title or a foreign/unknown category
    pub fn create(&self, user_id: UserId, new: &NewTask) -> Result<Task> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("task title is required".to_string()));
        }

        let conn = conn(&self.pool)?;
        if let Some(category_id) = new.category_id {
            ensure_category(&conn, user_id, category_id)?;
        }

        conn.execute(
            "INSERT INTO tasks (user_id, title, description, due_date, category_id, priority, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                user_id,
                title,
                new.description,
                new.due_date.map(|d| d.to_string()),
                new.category_id,
                new.priority.unwrap_or_default().as_str(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::debug!(task_id = id, user_id, "created task");

        find(&conn, user_id, id)?.ok_or_else(|| Error::Database(format!("task {id} vanished")))
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing task, `Validation` for an empty title or
    /// a foreign/unknown category
    pub fn update(&self, user_id: UserId, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        let conn = conn(&self.pool)?;
        let mut task =
            find(&conn, user_id, id)?.ok_or_else(|| Error::NotFound(format!("task {id}")))?;

        if let Some(title) = &patch.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(Error::Validation("task title is required".to_string()));
            }
            task.title = title.to_string();
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(description) = &patch.description {
            task.description.clone_from(description);
        }
        if let Some(category_id) = patch.category_id {
            if let Some(category_id) = category_id {
                ensure_category(&conn, user_id, category_id)?;
            }
            task.category_id = category_id;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }

        conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, completed = ?3, due_date = ?4,
                 category_id = ?5, priority = ?6
             WHERE id = ?7 AND user_id = ?8",
            rusqlite::params![
                task.title,
                task.description,
                task.completed,
                task.due_date.map(|d| d.to_string()),
                task.category_id,
                task.priority.as_str(),
                id,
                user_id,
            ],
        )?;

        Ok(task)
    }

    /// Delete a task
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing was deleted
    pub fn delete(&self, user_id: UserId, id: TaskId) -> Result<()> {
        let conn = conn(&self.pool)?;
        let deleted = conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, user_id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("task {id}")));
        }
        Ok(())
    }
}

fn find(conn: &Connection, user_id: UserId, id: TaskId) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user_id = ?2"),
            rusqlite::params![id, user_id],
            row_to_task,
        )
        .optional()?;
    Ok(task)
}

fn ensure_category(conn: &Connection, user_id: UserId, category_id: CategoryId) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1 AND user_id = ?2)",
        rusqlite::params![category_id, user_id],
        |row| row.get(0),
    )?;

    if exists {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid category {category_id}")))
    }
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let due_date: Option<String> = row.get(4)?;
    let priority: String = row.get(6)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        due_date: due_date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        category_id: row.get(5)?,
        priority: priority.parse().unwrap_or_default(),
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CategoryRepo, UserRepo, init_memory};
    use crate::model::{NewCategory, Priority};

    struct Fixture {
        tasks: TaskRepo,
        categories: CategoryRepo,
        user: UserId,
        other: UserId,
    }

    fn setup() -> Fixture {
        let pool = init_memory().unwrap();
        let users = UserRepo::new(pool.clone());
        Fixture {
            tasks: TaskRepo::new(pool.clone()),
            categories: CategoryRepo::new(pool),
            user: users.find_or_create("ana@example.com").unwrap().id,
            other: users.find_or_create("luis@example.com").unwrap().id,
        }
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            ..NewTask::default()
        }
    }

    #[test]
    fn test_create_and_get() {
        let f = setup();
        let due = NaiveDate::from_ymd_opt(2026, 5, 15).unwrap();

        let task = f
            .tasks
            .create(
                f.user,
                &NewTask {
                    title: "  entregar informe ".to_string(),
                    due_date: Some(due),
                    ..NewTask::default()
                },
            )
            .unwrap();

        assert_eq!(task.title, "entregar informe");
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.priority, Priority::Media);
        assert!(!task.completed);

        let fetched = f.tasks.get(f.user, task.id).unwrap();
        assert_eq!(fetched, task);
    }

    #[test]
    fn test_create_rejects_empty_title() {
        let f = setup();
        assert!(matches!(
            f.tasks.create(f.user, &new_task("   ")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_tasks_are_scoped_to_user() {
        let f = setup();
        let task = f.tasks.create(f.user, &new_task("comprar pan")).unwrap();

        assert!(matches!(f.tasks.get(f.other, task.id), Err(Error::NotFound(_))));
        assert!(f.tasks.list(f.other, CategoryFilter::All).unwrap().is_empty());
        assert!(matches!(
            f.tasks.update(f.other, task.id, &TaskPatch::complete()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(f.tasks.delete(f.other, task.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_orders_by_priority_then_newest() {
        let f = setup();
        let low = f.tasks.create(f.user, &new_task("baja")).unwrap();
        let mid = f.tasks.create(f.user, &new_task("media")).unwrap();
        f.tasks
            .update(f.user, low.id, &TaskPatch::set_priority(Priority::Baja))
            .unwrap();
        let high = f
            .tasks
            .create(
                f.user,
                &NewTask {
                    title: "alta".to_string(),
                    priority: Some(Priority::Alta),
                    ..NewTask::default()
                },
            )
            .unwrap();

        let ids: Vec<_> = f
            .tasks
            .list(f.user, CategoryFilter::All)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![high.id, mid.id, low.id]);
    }

    #[test]
    fn test_category_patch_is_tri_state() {
        let f = setup();
        let work = f
            .categories
            .create(
                f.user,
                &NewCategory {
                    name: "trabajo".to_string(),
                    color: None,
                },
            )
            .unwrap();
        let task = f.tasks.create(f.user, &new_task("informe")).unwrap();

        let task = f
            .tasks
            .update(f.user, task.id, &TaskPatch::set_category(work.id))
            .unwrap();
        assert_eq!(task.category_id, Some(work.id));

        // Absent key leaves it alone
        let task = f.tasks.update(f.user, task.id, &TaskPatch::complete()).unwrap();
        assert_eq!(task.category_id, Some(work.id));
        assert!(task.completed);

        // Explicit null clears it
        let task = f
            .tasks
            .update(f.user, task.id, &TaskPatch::clear_category())
            .unwrap();
        assert_eq!(task.category_id, None);
    }

    #[test]
    fn test_filters() {
        let f = setup();
        let work = f
            .categories
            .create(
                f.user,
                &NewCategory {
                    name: "trabajo".to_string(),
                    color: None,
                },
            )
            .unwrap();
        let categorized = f
            .tasks
            .create(
                f.user,
                &NewTask {
                    title: "informe".to_string(),
                    category_id: Some(work.id),
                    ..NewTask::default()
                },
            )
            .unwrap();
        let loose = f.tasks.create(f.user, &new_task("pan")).unwrap();

        let in_work = f.tasks.list(f.user, CategoryFilter::Category(work.id)).unwrap();
        assert_eq!(in_work.len(), 1);
        assert_eq!(in_work[0].id, categorized.id);

        let uncategorized = f.tasks.list(f.user, CategoryFilter::Uncategorized).unwrap();
        assert_eq!(uncategorized.len(), 1);
        assert_eq!(uncategorized[0].id, loose.id);
    }

    #[test]
    fn test_foreign_category_rejected() {
        let f = setup();
        let theirs = f
            .categories
            .create(
                f.other,
                &NewCategory {
                    name: "suya".to_string(),
                    color: None,
                },
            )
            .unwrap();
        let task = f.tasks.create(f.user, &new_task("pan")).unwrap();

        assert!(matches!(
            f.tasks.update(f.user, task.id, &TaskPatch::set_category(theirs.id)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_delete() {
        let f = setup();
        let task = f.tasks.create(f.user, &new_task("pan")).unwrap();
        f.tasks.delete(f.user, task.id).unwrap();
        assert!(matches!(f.tasks.get(f.user, task.id), Err(Error::NotFound(_))));
    }
}
