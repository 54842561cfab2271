//! Spoken reminders for tasks that are about to fall due

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tokio::task::JoinHandle;

use crate::config::ReminderConfig;
use crate::model::{CategoryFilter, Task, UserId};
use crate::speech::Speaker;
use crate::store::TaskStore;

/// Pending tasks due after `now` and no later than `now + horizon`
///
/// A due date counts from midnight at the start of that day in `now`'s zone.
#[must_use]
pub fn upcoming_tasks<'a, Tz: TimeZone>(
    tasks: &'a [Task],
    now: &DateTime<Tz>,
    horizon: chrono::Duration,
) -> Vec<&'a Task> {
    let limit = now.clone() + horizon;

    tasks
        .iter()
        .filter(|task| task.is_pending())
        .filter(|task| {
            task.due_date
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .and_then(|midnight| now.timezone().from_local_datetime(&midnight).earliest())
                .is_some_and(|due| due > *now && due <= limit)
        })
        .collect()
}

/// Reminder sentence, or `None` when nothing is due
#[must_use]
pub fn reminder_speech(tasks: &[&Task]) -> Option<String> {
    if tasks.is_empty() {
        return None;
    }

    let noun = if tasks.len() == 1 { "tarea" } else { "tareas" };
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();

    Some(format!(
        "Recordatorio: Tienes {} {noun} con fecha límite próxima: {}",
        tasks.len(),
        titles.join(", ")
    ))
}

/// Check once and speak if anything is due; returns what was said
///
/// Failures are logged, never returned.
pub async fn check_once(
    store: &dyn TaskStore,
    speaker: &dyn Speaker,
    user_id: UserId,
    horizon: chrono::Duration,
) -> Option<String> {
    let tasks = match store.list_tasks(user_id, CategoryFilter::All).await {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "reminder check failed");
            return None;
        }
    };

    let upcoming = upcoming_tasks(&tasks, &Local::now(), horizon);
    let speech = reminder_speech(&upcoming)?;

    tracing::info!(user_id, count = upcoming.len(), "speaking due-date reminder");
    if let Err(e) = speaker.speak(&speech).await {
        tracing::warn!(error = %e, "reminder speech failed");
    }

    Some(speech)
}

/// Run reminder checks on an interval until the task is aborted
///
/// The first check happens immediately.
pub fn spawn_reminders(
    store: Arc<dyn TaskStore>,
    speaker: Arc<dyn Speaker>,
    user_id: UserId,
    config: &ReminderConfig,
) -> JoinHandle<()> {
    let period = config.interval;
    let horizon = config.horizon;

    tracing::info!(
        interval_secs = period.as_secs(),
        horizon_hours = horizon.num_hours(),
        "reminders enabled"
    );

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            check_once(store.as_ref(), speaker.as_ref(), user_id, horizon).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::model::Priority;

    fn task(id: i64, title: &str, due: Option<NaiveDate>, completed: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: None,
            completed,
            due_date: due,
            category_id: None,
            priority: Priority::Media,
            created_at: Utc::now(),
        }
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_upcoming_window() {
        let now = Utc.with_ymd_and_hms(2025, 5, 14, 9, 0, 0).unwrap();
        let tasks = vec![
            task(1, "informe", Some(date(5, 15)), false),
            task(2, "hoy", Some(date(5, 14)), false),
            task(3, "pasado", Some(date(5, 16)), false),
            task(4, "hecha", Some(date(5, 15)), true),
            task(5, "sin fecha", None, false),
        ];

        let upcoming = upcoming_tasks(&tasks, &now, chrono::Duration::hours(24));
        let ids: Vec<_> = upcoming.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_window_upper_bound_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2025, 5, 14, 0, 0, 0).unwrap();
        let tasks = vec![task(1, "informe", Some(date(5, 15)), false)];

        assert_eq!(upcoming_tasks(&tasks, &now, chrono::Duration::hours(24)).len(), 1);
        assert!(upcoming_tasks(&tasks, &now, chrono::Duration::hours(23)).is_empty());
    }

    #[test]
    fn test_reminder_speech() {
        let one = task(1, "informe", None, false);
        let two = task(2, "pagar luz", None, false);

        assert_eq!(reminder_speech(&[]), None);
        assert_eq!(
            reminder_speech(&[&one]).unwrap(),
            "Recordatorio: Tienes 1 tarea con fecha límite próxima: informe"
        );
        assert_eq!(
            reminder_speech(&[&one, &two]).unwrap(),
            "Recordatorio: Tienes 2 tareas con fecha límite próxima: informe, pagar luz"
        );
    }
}
