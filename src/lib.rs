//! Voice Tasks - personal task manager driven by Spanish voice commands
//!
//! This library provides:
//! - A pure command interpreter (transcript + context in, action description out)
//! - `SQLite` storage for users, tasks and categories
//! - A voice session that executes actions and holds bulk confirmations
//! - Spoken replies (cloud TTS with local fallback) and due-date reminders
//! - An HTTP API for browser clients
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Interfaces                       │
//! │      HTTP API   │   CLI (command / listen)          │
//! └────────────────────┬────────────────────────────────┘
//!                      │ transcript
//! ┌────────────────────▼────────────────────────────────┐
//! │                 VoiceSession                        │
//! │  interpret ──► execute ──► speech  │  confirmation  │
//! └──────────┬─────────────────────────────┬────────────┘
//!            │                             │
//! ┌──────────▼──────────┐       ┌──────────▼────────────┐
//! │  TaskStore (SQLite) │       │ Speaker (TTS / local) │
//! └─────────────────────┘       └───────────────────────┘
//! ```

pub mod api;
pub mod command;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod reminder;
pub mod session;
pub mod speech;
pub mod store;

pub use command::{Action, ActionParams, Intent, InterpretationResult, interpret};
pub use config::Config;
pub use db::{DbConn, DbPool};
pub use error::{Error, Result};
pub use model::{
    Category, CategoryFilter, CategoryId, Context, NewCategory, NewTask, Priority, Task, TaskId,
    TaskPatch, UserId,
};
pub use session::{Reply, VoiceSession};
pub use speech::{FallbackSpeaker, Speaker};
pub use store::{SqliteStore, TaskStore};
