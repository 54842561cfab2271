//! Shared test utilities
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use voice_tasks::db::{self, User, UserRepo};
use voice_tasks::model::{Category, CategoryId, Priority, Task, TaskId};
use voice_tasks::{DbPool, NewCategory, NewTask, SqliteStore, TaskStore, VoiceSession};

/// Set up an in-memory test database
#[must_use]
pub fn setup_test_db() -> DbPool {
    db::init_memory().expect("failed to init test db")
}

/// Create a test user in the database
pub fn create_test_user(db: &DbPool, email: &str) -> User {
    UserRepo::new(db.clone())
        .find_or_create(email)
        .expect("failed to create test user")
}

/// Database, store and a voice session for one fresh user
pub struct Fixture {
    pub db: DbPool,
    pub store: Arc<dyn TaskStore>,
    pub session: Arc<VoiceSession>,
    pub user: User,
}

pub fn setup_session() -> Fixture {
    let db = setup_test_db();
    let user = create_test_user(&db, "ana@example.com");
    let store: Arc<dyn TaskStore> = Arc::new(SqliteStore::new(db.clone()));
    let session = Arc::new(VoiceSession::new(store.clone(), user.id));

    Fixture {
        db,
        store,
        session,
        user,
    }
}

impl Fixture {
    pub async fn add_task(&self, title: &str) -> Task {
        self.store
            .create_task(
                self.user.id,
                NewTask {
                    title: title.to_string(),
                    ..NewTask::default()
                },
            )
            .await
            .expect("failed to create task")
    }

    pub async fn add_category(&self, name: &str) -> Category {
        self.store
            .create_category(
                self.user.id,
                NewCategory {
                    name: name.to_string(),
                    color: None,
                },
            )
            .await
            .expect("failed to create category")
    }

    pub async fn task(&self, id: TaskId) -> Task {
        self.store
            .get_task(self.user.id, id)
            .await
            .expect("task should exist")
    }
}

/// In-memory task for interpreter tests
pub fn task(id: TaskId, title: &str) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: None,
        completed: false,
        due_date: None,
        category_id: None,
        priority: Priority::Media,
        created_at: Utc::now(),
    }
}

pub fn category(id: CategoryId, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        color: "#6366F1".to_string(),
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}
