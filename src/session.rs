//! Voice session: runs interpreted commands against storage
//!
//! The interpreter only describes what to do. The session is the caller that
//! snapshots tasks and categories, executes the resulting action, keeps the
//! category filter and the one pending confirmation, and decides what to say.

use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::command::{
    self, Action, ActionParams, Intent, InterpretationResult, PendingCategoryAssignment,
    apply_confirmed_action,
};
use crate::model::{CategoryFilter, Context, NewTask, TaskPatch, UserId};
use crate::store::TaskStore;
use crate::{Error, Result};

/// What to tell the user after an utterance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// Text to speak; `None` means stay silent
    pub speech: Option<String>,
    /// A bulk action is waiting for a yes/no answer
    pub awaiting_confirmation: bool,
}

impl Reply {
    fn say(speech: impl Into<String>) -> Self {
        Self {
            speech: Some(speech.into()),
            awaiting_confirmation: false,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    filter: CategoryFilter,
    pending: Option<PendingCategoryAssignment>,
}

/// Per-user voice command session
pub struct VoiceSession {
    store: Arc<dyn TaskStore>,
    user_id: UserId,
    state: Mutex<SessionState>,
}

impl VoiceSession {
    /// Create a session for one user
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, user_id: UserId) -> Self {
        Self {
            store,
            user_id,
            state: Mutex::new(SessionState::default()),
        }
    }

    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Storage used by this session
    #[must_use]
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Currently selected category filter
    pub async fn filter(&self) -> CategoryFilter {
        self.state.lock().await.filter
    }

    /// Bulk action waiting for confirmation, if any
    pub async fn pending(&self) -> Option<PendingCategoryAssignment> {
        self.state.lock().await.pending.clone()
    }

    /// Fresh snapshot of the user's tasks (under the current filter) and categories
    ///
    /// # Errors
    ///
    /// Returns error if storage cannot be read
    pub async fn context(&self) -> Result<Context> {
        let filter = self.filter().await;
        let tasks = self.store.list_tasks(self.user_id, filter).await?;
        let categories = self.store.list_categories(self.user_id).await?;

        Ok(Context::new(tasks, categories, Local::now().date_naive()).with_filter(filter))
    }

    /// Interpret and execute one transcript
    ///
    /// Execution failures are logged and reported as speech.
    ///
    /// # Errors
    ///
    /// Returns error only if the context snapshot cannot be loaded
    pub async fn handle(&self, transcript: &str) -> Result<Reply> {
        let ctx = self.context().await?;

        let reply = match command::interpret(transcript, &ctx) {
            InterpretationResult::Action(action) => self.run(action).await,
            InterpretationResult::Informational { speech }
            | InterpretationResult::Failure { speech } => Reply::say(speech),
            InterpretationResult::Unrecognized => {
                tracing::debug!(transcript, "no voice command recognized");
                Reply::default()
            }
        };

        Ok(reply)
    }

    /// Execute the pending bulk action after the user said yes
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing is waiting for confirmation
    pub async fn confirm(&self) -> Result<Reply> {
        let pending = self
            .state
            .lock()
            .await
            .pending
            .take()
            .ok_or_else(|| Error::NotFound("no action awaiting confirmation".to_string()))?;

        let result = apply_confirmed_action(self.store.as_ref(), self.user_id, &pending).await;
        Ok(Reply::say(result.speech()))
    }

    /// Drop the pending bulk action; returns whether there was one
    pub async fn cancel(&self) -> bool {
        let dropped = self.state.lock().await.pending.take();
        if let Some(pending) = &dropped {
            tracing::info!(category = %pending.category_name, "bulk assignment cancelled");
        }
        dropped.is_some()
    }

    async fn run(&self, action: Action) -> Reply {
        if action.requires_confirmation {
            let mut state = self.state.lock().await;
            state.pending.clone_from(&action.pending);
            return Reply {
                speech: Some(action.speech),
                awaiting_confirmation: state.pending.is_some(),
            };
        }

        match self.execute(&action.params).await {
            Ok(()) => {
                tracing::info!(intent = %action.intent, "voice command executed");
                Reply::say(action.speech)
            }
            Err(e) => {
                tracing::error!(intent = %action.intent, error = %e, "voice command failed");
                Reply::say(failure_speech(action.intent))
            }
        }
    }

    async fn execute(&self, params: &ActionParams) -> Result<()> {
        let user = self.user_id;

        match params {
            ActionParams::CreateTask {
                title,
                due_date,
                category_id,
            } => {
                let task = NewTask {
                    title: title.clone(),
                    due_date: *due_date,
                    category_id: *category_id,
                    ..NewTask::default()
                };
                self.store.create_task(user, task).await?;
            }
            ActionParams::CompleteTask { task_id } => {
                self.store.update_task(user, *task_id, TaskPatch::complete()).await?;
            }
            ActionParams::DeleteTask { task_id } => {
                self.store.delete_task(user, *task_id).await?;
            }
            ActionParams::SetFilter { filter } => {
                self.state.lock().await.filter = *filter;
            }
            ActionParams::AssignCategory {
                task_id,
                category_id,
            } => {
                self.store
                    .update_task(user, *task_id, TaskPatch::set_category(*category_id))
                    .await?;
            }
            ActionParams::RemoveCategory { task_id } => {
                self.store
                    .update_task(user, *task_id, TaskPatch::clear_category())
                    .await?;
            }
            ActionParams::AssignPriority { task_id, priority } => {
                self.store
                    .update_task(user, *task_id, TaskPatch::set_priority(*priority))
                    .await?;
            }
            ActionParams::AssignCategoryToAll { .. } => {
                return Err(Error::Validation(
                    "bulk assignment must go through confirmation".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Spoken when storage rejects an otherwise valid command
const fn failure_speech(intent: Intent) -> &'static str {
    match intent {
        Intent::CreateTask => "Hubo un error al crear la tarea",
        Intent::CompleteTask => "Hubo un error al completar la tarea",
        Intent::DeleteTask => "Hubo un error al eliminar la tarea",
        Intent::AssignCategoryToTask => "Hubo un error al asignar la categoría a la tarea",
        Intent::RemoveCategoryFromTask => "Hubo un error al quitar la categoría de la tarea",
        Intent::AssignPriorityToTask => "Hubo un error al asignar la prioridad a la tarea",
        Intent::AssignCategoryToAll => "Hubo un error al asignar la categoría a las tareas",
        Intent::FilterByCategory | Intent::ListPendingTasks | Intent::Unrecognized => {
            "Hubo un error al procesar el comando"
        }
    }
}
