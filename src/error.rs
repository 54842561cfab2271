//! Error types for the voice task manager

use thiserror::Error;

/// Result type alias for task manager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the command interpreter
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Speech output error (playback or local synthesizer)
    #[error("speech error: {0}")]
    Speech(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Resource not found (or owned by another user)
    #[error("not found: {0}")]
    NotFound(String),

    /// Rejected input (empty title, unknown category, ...)
    #[error("validation error: {0}")]
    Validation(String),

    /// Uniqueness violation (duplicate category name)
    #[error("conflict: {0}")]
    Conflict(String),
}
