//! Entity resolution against the interpretation context

use crate::model::{Category, Task};

/// Which tasks a reference may resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Only tasks that are not completed
    Pending,
    /// Any task in the list
    Any,
}

/// Find a category by exact, case-insensitive name
///
/// Names are unique per user, so at most one category can match.
#[must_use]
pub fn find_category<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    let wanted = name.trim().to_lowercase();
    categories.iter().find(|c| c.name.to_lowercase() == wanted)
}

/// Find the first task whose title contains `fragment`, case-insensitively
///
/// Ties are broken by list order: the earliest matching task wins.
#[must_use]
pub fn find_task<'a>(tasks: &'a [Task], fragment: &str, scope: TaskScope) -> Option<&'a Task> {
    let wanted = fragment.to_lowercase();
    tasks.iter().find(|t| {
        (scope == TaskScope::Any || t.is_pending()) && t.title.to_lowercase().contains(&wanted)
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::Priority;

    fn task(id: i64, title: &str, completed: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: None,
            completed,
            due_date: None,
            category_id: None,
            priority: Priority::Media,
            created_at: Utc::now(),
        }
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            color: "#000000".to_string(),
        }
    }

    #[test]
    fn test_category_exact_match_only() {
        let categories = vec![category(1, "Trabajo"), category(2, "Casa")];

        assert_eq!(find_category(&categories, "trabajo").map(|c| c.id), Some(1));
        assert_eq!(find_category(&categories, "CASA").map(|c| c.id), Some(2));
        assert!(find_category(&categories, "trab").is_none());
        assert!(find_category(&categories, "trabajos").is_none());
    }

    #[test]
    fn test_task_first_match_in_list_order() {
        let tasks = vec![
            task(1, "comprar pan", false),
            task(2, "comprar pan integral", false),
        ];

        assert_eq!(find_task(&tasks, "comprar pan", TaskScope::Pending).map(|t| t.id), Some(1));
        assert_eq!(find_task(&tasks, "INTEGRAL", TaskScope::Pending).map(|t| t.id), Some(2));
    }

    #[test]
    fn test_pending_scope_skips_completed() {
        let tasks = vec![
            task(1, "comprar pan", true),
            task(2, "comprar pan integral", false),
        ];

        assert_eq!(find_task(&tasks, "pan", TaskScope::Pending).map(|t| t.id), Some(2));
        assert_eq!(find_task(&tasks, "pan", TaskScope::Any).map(|t| t.id), Some(1));
    }

    #[test]
    fn test_unknown_task() {
        let tasks = vec![task(1, "comprar pan", false)];
        assert!(find_task(&tasks, "xyz", TaskScope::Any).is_none());
    }
}
