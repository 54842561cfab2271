//! Voice command interpreter
//!
//! Turns one transcribed utterance plus a read-only [`Context`] into an
//! [`InterpretationResult`]: a description of what the caller should do, never
//! the doing itself. No I/O happens here and nothing in the context is
//! mutated, so calls are idempotent and safe to run concurrently.
//!
//! ```text
//! transcript ──► classify ──► extract ──► resolve ──► InterpretationResult
//!               (intent)     (regex)     (context)     Action | Informational
//!                                                      Failure | Unrecognized
//! ```

mod confirm;
mod extract;
mod intent;
pub mod reply;
mod resolve;

use chrono::{Datelike, NaiveDate};

pub use confirm::{BulkResult, PendingCategoryAssignment, apply_confirmed_action};
pub use extract::{MONTHS, due_date, month_number};
pub use intent::{INTENT_TABLE, Intent, IntentRule, classify};
pub use resolve::{TaskScope, find_category, find_task};

use crate::model::{CategoryFilter, CategoryId, Context, Priority, TaskId};

/// Parameters of an action, ready to run against storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionParams {
    CreateTask {
        title: String,
        due_date: Option<NaiveDate>,
        category_id: Option<CategoryId>,
    },
    CompleteTask {
        task_id: TaskId,
    },
    DeleteTask {
        task_id: TaskId,
    },
    /// Change the caller's category filter (no storage call)
    SetFilter {
        filter: CategoryFilter,
    },
    AssignCategory {
        task_id: TaskId,
        category_id: CategoryId,
    },
    RemoveCategory {
        task_id: TaskId,
    },
    AssignPriority {
        task_id: TaskId,
        priority: Priority,
    },
    /// Bulk assignment; the affected tasks live in [`Action::pending`]
    AssignCategoryToAll {
        category_id: CategoryId,
    },
}

/// A state change the caller should carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub intent: Intent,
    pub params: ActionParams,
    /// When set, hold `pending` and wait for an explicit yes before executing
    pub requires_confirmation: bool,
    /// Spoken after a successful execution, or as the question when
    /// confirmation is required
    pub speech: String,
    pub pending: Option<PendingCategoryAssignment>,
}

impl Action {
    fn immediate(intent: Intent, params: ActionParams, speech: String) -> Self {
        Self {
            intent,
            params,
            requires_confirmation: false,
            speech,
            pending: None,
        }
    }
}

/// Result of interpreting one transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpretationResult {
    Action(Action),
    /// Reply only, nothing to change
    Informational { speech: String },
    /// Malformed arguments or an unresolved reference
    Failure { speech: String },
    /// No trigger matched, or a create command had no title; stay silent
    Unrecognized,
}

impl InterpretationResult {
    /// Speech the caller should say right away, if any
    #[must_use]
    pub fn speech(&self) -> Option<&str> {
        match self {
            Self::Action(action) => Some(&action.speech),
            Self::Informational { speech } | Self::Failure { speech } => Some(speech),
            Self::Unrecognized => None,
        }
    }

    /// The action, if this result carries one
    #[must_use]
    pub const fn action(&self) -> Option<&Action> {
        match self {
            Self::Action(action) => Some(action),
            _ => None,
        }
    }

    fn failure(speech: impl Into<String>) -> Self {
        Self::Failure {
            speech: speech.into(),
        }
    }

    fn informational(speech: impl Into<String>) -> Self {
        Self::Informational {
            speech: speech.into(),
        }
    }
}

/// Interpret a transcript against a context snapshot
///
/// Never fails: every problem is reported through the returned value.
#[must_use]
pub fn interpret(transcript: &str, ctx: &Context) -> InterpretationResult {
    let intent = classify(transcript);

    let result = match intent {
        Intent::CreateTask => create_task(transcript, ctx),
        Intent::ListPendingTasks => list_pending(ctx),
        Intent::CompleteTask => complete_task(transcript, ctx),
        Intent::DeleteTask => delete_task(transcript, ctx),
        Intent::FilterByCategory => filter_by_category(transcript, ctx),
        Intent::AssignCategoryToTask => assign_category(transcript, ctx),
        Intent::AssignCategoryToAll => assign_category_to_all(transcript, ctx),
        Intent::RemoveCategoryFromTask => remove_category(transcript, ctx),
        Intent::AssignPriorityToTask => assign_priority(transcript, ctx),
        Intent::Unrecognized => InterpretationResult::Unrecognized,
    };

    tracing::debug!(
        %intent,
        outcome = outcome_label(&result),
        "interpreted voice command"
    );

    result
}

const fn outcome_label(result: &InterpretationResult) -> &'static str {
    match result {
        InterpretationResult::Action(a) if a.requires_confirmation => "needs_confirmation",
        InterpretationResult::Action(_) => "action",
        InterpretationResult::Informational { .. } => "informational",
        InterpretationResult::Failure { .. } => "failure",
        InterpretationResult::Unrecognized => "unrecognized",
    }
}

fn create_task(transcript: &str, ctx: &Context) -> InterpretationResult {
    let title = extract::create_title(transcript);
    if title.is_empty() {
        tracing::debug!("create command without a title, ignoring");
        return InterpretationResult::Unrecognized;
    }

    let due_date = extract::due_date(&title, ctx.today.year());

    // Unknown inline category: the task is still created, just uncategorized
    let category_id = extract::inline_category(&title)
        .and_then(|name| find_category(&ctx.categories, &name))
        .map(|c| c.id);

    let speech = reply::task_created(&title);
    InterpretationResult::Action(Action::immediate(
        Intent::CreateTask,
        ActionParams::CreateTask {
            title,
            due_date,
            category_id,
        },
        speech,
    ))
}

fn list_pending(ctx: &Context) -> InterpretationResult {
    let titles: Vec<&str> = ctx.pending_tasks().map(|t| t.title.as_str()).collect();
    if titles.is_empty() {
        InterpretationResult::informational(reply::NO_PENDING_TASKS)
    } else {
        InterpretationResult::informational(reply::pending_tasks(&titles))
    }
}

fn complete_task(transcript: &str, ctx: &Context) -> InterpretationResult {
    let fragment = extract::completion_fragment(transcript);
    if fragment.is_empty() {
        return InterpretationResult::failure(reply::COMPLETE_FORMAT);
    }

    match find_task(&ctx.tasks, &fragment, TaskScope::Pending) {
        Some(task) => InterpretationResult::Action(Action::immediate(
            Intent::CompleteTask,
            ActionParams::CompleteTask { task_id: task.id },
            reply::task_completed(&task.title),
        )),
        None => InterpretationResult::failure(reply::TASK_NOT_PENDING),
    }
}

fn delete_task(transcript: &str, ctx: &Context) -> InterpretationResult {
    let fragment = extract::deletion_fragment(transcript);
    if fragment.is_empty() {
        return InterpretationResult::failure(reply::DELETE_FORMAT);
    }

    match find_task(&ctx.tasks, &fragment, TaskScope::Any) {
        Some(task) => InterpretationResult::Action(Action::immediate(
            Intent::DeleteTask,
            ActionParams::DeleteTask { task_id: task.id },
            reply::task_deleted(&task.title),
        )),
        None => InterpretationResult::failure(reply::task_not_found(&fragment)),
    }
}

fn filter_by_category(transcript: &str, ctx: &Context) -> InterpretationResult {
    let name = extract::filter_name(transcript);
    if name.is_empty() {
        return InterpretationResult::failure(reply::FILTER_FORMAT);
    }

    let (filter, speech) = match name.as_str() {
        "todas" | "todos" => (CategoryFilter::All, reply::SHOWING_ALL.to_string()),
        "sin categoría" | "sin categorizar" => (
            CategoryFilter::Uncategorized,
            reply::SHOWING_UNCATEGORIZED.to_string(),
        ),
        _ => match find_category(&ctx.categories, &name) {
            Some(category) => (
                CategoryFilter::Category(category.id),
                reply::showing_category(&category.name),
            ),
            None => return InterpretationResult::failure(reply::category_not_found(&name)),
        },
    };

    InterpretationResult::Action(Action::immediate(
        Intent::FilterByCategory,
        ActionParams::SetFilter { filter },
        speech,
    ))
}

fn assign_category(transcript: &str, ctx: &Context) -> InterpretationResult {
    let Some(parsed) = extract::category_for_task(transcript) else {
        return InterpretationResult::failure(reply::CATEGORY_FOR_TASK_FORMAT);
    };

    let Some(category) = find_category(&ctx.categories, &parsed.category) else {
        return InterpretationResult::failure(reply::category_must_exist(&parsed.category));
    };

    let Some(task) = find_task(&ctx.tasks, &parsed.task, TaskScope::Pending) else {
        return InterpretationResult::failure(reply::pending_task_not_found(&parsed.task));
    };

    InterpretationResult::Action(Action::immediate(
        Intent::AssignCategoryToTask,
        ActionParams::AssignCategory {
            task_id: task.id,
            category_id: category.id,
        },
        reply::category_assigned(&category.name, &task.title),
    ))
}

fn assign_category_to_all(transcript: &str, ctx: &Context) -> InterpretationResult {
    let Some(name) = extract::category_for_all(transcript) else {
        return InterpretationResult::failure(reply::CATEGORY_FOR_ALL_FORMAT);
    };

    let Some(category) = find_category(&ctx.categories, &name) else {
        return InterpretationResult::failure(reply::category_must_exist(&name));
    };

    let affected_task_ids: Vec<TaskId> = ctx.pending_tasks().map(|t| t.id).collect();
    if affected_task_ids.is_empty() {
        return InterpretationResult::informational(reply::NO_PENDING_TO_CATEGORIZE);
    }

    let pending = PendingCategoryAssignment {
        category_id: category.id,
        category_name: category.name.clone(),
        affected_task_ids,
    };

    InterpretationResult::Action(Action {
        intent: Intent::AssignCategoryToAll,
        params: ActionParams::AssignCategoryToAll {
            category_id: category.id,
        },
        requires_confirmation: true,
        speech: pending.question(),
        pending: Some(pending),
    })
}

fn remove_category(transcript: &str, ctx: &Context) -> InterpretationResult {
    let Some(fragment) = extract::category_removal_task(transcript) else {
        return InterpretationResult::failure(reply::CATEGORY_REMOVAL_FORMAT);
    };

    let Some(task) = find_task(&ctx.tasks, &fragment, TaskScope::Any) else {
        return InterpretationResult::failure(reply::task_not_found(&fragment));
    };

    if task.category_id.is_none() {
        return InterpretationResult::informational(reply::no_category_assigned(&task.title));
    }

    InterpretationResult::Action(Action::immediate(
        Intent::RemoveCategoryFromTask,
        ActionParams::RemoveCategory { task_id: task.id },
        reply::category_removed(&task.title),
    ))
}

fn assign_priority(transcript: &str, ctx: &Context) -> InterpretationResult {
    let Some((fragment, priority)) = extract::priority_for_task(transcript) else {
        return InterpretationResult::failure(reply::PRIORITY_FORMAT);
    };

    let Some(task) = find_task(&ctx.tasks, &fragment, TaskScope::Pending) else {
        return InterpretationResult::failure(reply::pending_task_not_found(&fragment));
    };

    InterpretationResult::Action(Action::immediate(
        Intent::AssignPriorityToTask,
        ActionParams::AssignPriority {
            task_id: task.id,
            priority,
        },
        reply::priority_changed(&task.title, priority),
    ))
}
