//! Storage collaborator
//!
//! Everything the voice layer needs from persistence, behind an async trait
//! so the session and the bulk confirmation path do not care where tasks live.

use async_trait::async_trait;

use crate::db::{CategoryRepo, DbPool, TaskRepo};
use crate::model::{
    Category, CategoryFilter, CategoryId, CategoryPatch, NewCategory, NewTask, Task, TaskId,
    TaskPatch, UserId,
};
use crate::{Error, Result};

/// Task and category persistence, scoped per user
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks in display order (priority, then newest first)
    async fn list_tasks(&self, user_id: UserId, filter: CategoryFilter) -> Result<Vec<Task>>;

    async fn get_task(&self, user_id: UserId, id: TaskId) -> Result<Task>;

    async fn create_task(&self, user_id: UserId, task: NewTask) -> Result<Task>;

    /// Partial update; see [`TaskPatch`] for the null/absent distinction
    async fn update_task(&self, user_id: UserId, id: TaskId, patch: TaskPatch) -> Result<Task>;

    async fn delete_task(&self, user_id: UserId, id: TaskId) -> Result<()>;

    async fn list_categories(&self, user_id: UserId) -> Result<Vec<Category>>;

    async fn create_category(&self, user_id: UserId, category: NewCategory) -> Result<Category>;

    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category>;

    /// Delete a category; its tasks become uncategorized
    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<()>;
}

/// `SQLite`-backed store; repository calls run on the blocking pool
#[derive(Clone)]
pub struct SqliteStore {
    tasks: TaskRepo,
    categories: CategoryRepo,
}

impl SqliteStore {
    /// Create a store over a connection pool
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self {
            tasks: TaskRepo::new(pool.clone()),
            categories: CategoryRepo::new(pool),
        }
    }
}

/// Run a blocking repository call off the async runtime
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Database(format!("storage task failed: {e}")))?
}

#[async_trait]
impl TaskStore for SqliteStore {
    async fn list_tasks(&self, user_id: UserId, filter: CategoryFilter) -> Result<Vec<Task>> {
        let repo = self.tasks.clone();
        blocking(move || repo.list(user_id, filter)).await
    }

    async fn get_task(&self, user_id: UserId, id: TaskId) -> Result<Task> {
        let repo = self.tasks.clone();
        blocking(move || repo.get(user_id, id)).await
    }

    async fn create_task(&self, user_id: UserId, task: NewTask) -> Result<Task> {
        let repo = self.tasks.clone();
        blocking(move || repo.create(user_id, &task)).await
    }

    async fn update_task(&self, user_id: UserId, id: TaskId, patch: TaskPatch) -> Result<Task> {
        let repo = self.tasks.clone();
        blocking(move || repo.update(user_id, id, &patch)).await
    }

    async fn delete_task(&self, user_id: UserId, id: TaskId) -> Result<()> {
        let repo = self.tasks.clone();
        blocking(move || repo.delete(user_id, id)).await
    }

    async fn list_categories(&self, user_id: UserId) -> Result<Vec<Category>> {
        let repo = self.categories.clone();
        blocking(move || repo.list(user_id)).await
    }

    async fn create_category(&self, user_id: UserId, category: NewCategory) -> Result<Category> {
        let repo = self.categories.clone();
        blocking(move || repo.create(user_id, &category)).await
    }

    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category> {
        let repo = self.categories.clone();
        blocking(move || repo.update(user_id, id, &patch)).await
    }

    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<()> {
        let repo = self.categories.clone();
        blocking(move || repo.delete(user_id, id)).await
    }
}
