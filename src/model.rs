//! Task and category domain types shared by storage, the interpreter and the API

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Task identifier (storage-assigned, scoped to the owning user)
pub type TaskId = i64;

/// Category identifier (storage-assigned, scoped to the owning user)
pub type CategoryId = i64;

/// User identifier
pub type UserId = i64;

/// Colour given to categories created without one
pub const DEFAULT_CATEGORY_COLOR: &str = "#6366F1";

/// Task priority level
///
/// Ordering follows urgency: `Alta < Media < Baja`, so sorting ascending puts
/// the most urgent tasks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Alta,
    #[default]
    Media,
    Baja,
}

impl Priority {
    /// Spoken/stored name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alta => "alta",
            Self::Media => "media",
            Self::Baja => "baja",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alta" => Ok(Self::Alta),
            "media" => Ok(Self::Media),
            "baja" => Ok(Self::Baja),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// A task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task still needs doing
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !self.completed
    }
}

/// A user-defined category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
}

/// Which tasks the caller is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "categoryId", rename_all = "camelCase")]
pub enum CategoryFilter {
    /// Every task
    #[default]
    All,
    /// Only tasks without a category
    Uncategorized,
    /// Only tasks in the given category
    Category(CategoryId),
}

impl CategoryFilter {
    /// Whether a task passes this filter
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Uncategorized => task.category_id.is_none(),
            Self::Category(id) => task.category_id == Some(id),
        }
    }
}

/// Read-only snapshot handed to every interpretation call
#[derive(Debug, Clone)]
pub struct Context {
    /// Tasks in display order (resolution tie-break follows this order)
    pub tasks: Vec<Task>,
    pub categories: Vec<Category>,
    pub selected_filter: CategoryFilter,
    /// Caller's current local date, source of the default year for due dates
    pub today: NaiveDate,
}

impl Context {
    /// Build a context with no filter selected
    #[must_use]
    pub const fn new(tasks: Vec<Task>, categories: Vec<Category>, today: NaiveDate) -> Self {
        Self {
            tasks,
            categories,
            selected_filter: CategoryFilter::All,
            today,
        }
    }

    /// Set the currently selected filter
    #[must_use]
    pub fn with_filter(mut self, filter: CategoryFilter) -> Self {
        self.selected_filter = filter;
        self
    }

    /// Tasks that are not completed, in list order
    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_pending())
    }
}

/// Fields for a new task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Partial task update
///
/// Absent fields are left unchanged. `category_id` distinguishes an absent key
/// (`None`) from an explicit `null` (`Some(None)`, which clears the category).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category_id: Option<Option<CategoryId>>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl TaskPatch {
    #[must_use]
    pub fn complete() -> Self {
        Self {
            completed: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn set_category(category_id: CategoryId) -> Self {
        Self {
            category_id: Some(Some(category_id)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn clear_category() -> Self {
        Self {
            category_id: Some(None),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn set_priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }
}

/// Fields for a new category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Partial category update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Present-but-null keys become `Some(None)`; absent keys use the field default
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_puts_alta_first() {
        let mut levels = vec![Priority::Baja, Priority::Alta, Priority::Media];
        levels.sort();
        assert_eq!(levels, vec![Priority::Alta, Priority::Media, Priority::Baja]);
    }

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!("ALTA".parse::<Priority>(), Ok(Priority::Alta));
        assert_eq!(" baja ".parse::<Priority>(), Ok(Priority::Baja));
        assert!("urgente".parse::<Priority>().is_err());
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let absent: TaskPatch = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert_eq!(absent.category_id, None);

        let cleared: TaskPatch = serde_json::from_str(r#"{"categoryId": null}"#).unwrap();
        assert_eq!(cleared.category_id, Some(None));

        let set: TaskPatch = serde_json::from_str(r#"{"categoryId": 4}"#).unwrap();
        assert_eq!(set.category_id, Some(Some(4)));
    }

    #[test]
    fn test_filter_matches() {
        let task = Task {
            id: 1,
            title: "comprar pan".to_string(),
            description: None,
            completed: false,
            due_date: None,
            category_id: Some(2),
            priority: Priority::Media,
            created_at: Utc::now(),
        };

        assert!(CategoryFilter::All.matches(&task));
        assert!(CategoryFilter::Category(2).matches(&task));
        assert!(!CategoryFilter::Category(3).matches(&task));
        assert!(!CategoryFilter::Uncategorized.matches(&task));
    }
}
