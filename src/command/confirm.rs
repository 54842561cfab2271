//! Confirmation gate for bulk actions
//!
//! Only the bulk category assignment is gated. The interpreter hands back a
//! [`PendingCategoryAssignment`]; the caller holds it until the user says yes
//! and then calls [`apply_confirmed_action`].

use futures::future::join_all;
use serde::Serialize;

use crate::model::{CategoryId, TaskId, TaskPatch, UserId};
use crate::store::TaskStore;

/// Data held while waiting for the user to confirm a bulk assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCategoryAssignment {
    pub category_id: CategoryId,
    pub category_name: String,
    /// Every pending task at interpretation time, in list order
    pub affected_task_ids: Vec<TaskId>,
}

impl PendingCategoryAssignment {
    /// Question asked before anything is changed
    #[must_use]
    pub fn question(&self) -> String {
        format!(
            "¿Quieres asignar la categoría {} a tus {} tareas pendientes?",
            self.category_name,
            self.affected_task_ids.len()
        )
    }
}

/// Outcome of a confirmed bulk assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    pub category_name: String,
    pub updated: Vec<TaskId>,
    pub failed: Vec<TaskId>,
}

impl BulkResult {
    /// Number of tasks actually updated
    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }

    /// Summary spoken once all updates have finished
    #[must_use]
    pub fn speech(&self) -> String {
        format!(
            "He asignado la categoría {} a {} tareas pendientes.",
            self.category_name,
            self.updated_count()
        )
    }
}

/// Apply a confirmed bulk assignment: one update per affected task
///
/// All updates are issued concurrently and awaited jointly. Individual
/// failures are logged and counted, never retried, and do not stop the rest.
pub async fn apply_confirmed_action<S>(
    store: &S,
    user_id: UserId,
    pending: &PendingCategoryAssignment,
) -> BulkResult
where
    S: TaskStore + ?Sized,
{
    let updates = pending.affected_task_ids.iter().map(|&task_id| async move {
        let outcome = store
            .update_task(user_id, task_id, TaskPatch::set_category(pending.category_id))
            .await;
        (task_id, outcome)
    });

    let mut result = BulkResult {
        category_name: pending.category_name.clone(),
        updated: Vec::with_capacity(pending.affected_task_ids.len()),
        failed: Vec::new(),
    };

    for (task_id, outcome) in join_all(updates).await {
        match outcome {
            Ok(_) => result.updated.push(task_id),
            Err(e) => {
                tracing::warn!(task_id, error = %e, "failed to assign category during bulk update");
                result.failed.push(task_id);
            }
        }
    }

    tracing::info!(
        category = %pending.category_name,
        updated = result.updated.len(),
        failed = result.failed.len(),
        "bulk category assignment finished"
    );

    result
}
