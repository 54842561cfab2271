//! Configuration management for the voice task manager

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Result};

use file::ConfigFile;

/// Default API port
pub const DEFAULT_PORT: u16 = 18790;

/// User managed when none is configured
pub const DEFAULT_USER: &str = "local@voice-tasks";

/// Task manager configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to data directory (database)
    pub data_dir: PathBuf,

    /// Email of the user this instance serves
    pub user_email: String,

    /// HTTP API server configuration
    pub api_server: ApiServerConfig,

    /// Speech output configuration
    pub speech: SpeechConfig,

    /// Due-date reminders
    pub reminders: ReminderConfig,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Bearer key for `/api/*` (from `TASKS_API_KEY` env)
    pub api_key: Option<String>,
}

/// Speech output configuration
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// `OpenAI` key; cloud TTS is disabled without it
    pub openai_api_key: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,

    /// Use a local synthesizer when cloud TTS fails or is missing
    pub local_fallback: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
            local_fallback: true,
        }
    }
}

/// Reminder loop configuration
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    pub enabled: bool,

    /// Time between checks
    pub interval: Duration,

    /// How far ahead a due date counts as upcoming
    pub horizon: chrono::Duration,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(60),
            horizon: chrono::Duration::hours(24),
        }
    }
}

impl Config {
    /// Load configuration (env > toml > default)
    ///
    /// # Errors
    ///
    /// Returns error if a value is out of range or the data directory cannot be created
    pub fn load() -> Result<Self> {
        let config = Self::from_sources(file::load_config_file(), |key| std::env::var(key).ok())?;
        std::fs::create_dir_all(&config.data_dir)?;
        Ok(config)
    }

    /// Build configuration from a parsed file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if a value is out of range
    pub fn from_sources(fc: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Data directory (~/.local/share/voice-tasks on Linux)
        let data_dir = env("TASKS_DATA_DIR")
            .or(fc.data_dir)
            .map(PathBuf::from)
            .or_else(|| directories::BaseDirs::new().map(|d| d.data_dir().join("voice-tasks")))
            .unwrap_or_else(|| PathBuf::from("."));

        let user_email = env("TASKS_USER")
            .or(fc.user)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        let api_server = ApiServerConfig {
            port: env("TASKS_PORT")
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(DEFAULT_PORT),
            api_key: env("TASKS_API_KEY").or(fc.server.api_key),
        };

        let defaults = SpeechConfig::default();
        let speech = SpeechConfig {
            openai_api_key: env("OPENAI_API_KEY")
                .or(fc.speech.openai_api_key)
                .filter(|k| !k.is_empty()),
            tts_model: env("TASKS_TTS_MODEL")
                .or(fc.speech.tts_model)
                .unwrap_or(defaults.tts_model),
            tts_voice: env("TASKS_TTS_VOICE")
                .or(fc.speech.tts_voice)
                .unwrap_or(defaults.tts_voice),
            tts_speed: env("TASKS_TTS_SPEED")
                .and_then(|s| s.parse().ok())
                .or(fc.speech.tts_speed)
                .unwrap_or(defaults.tts_speed),
            local_fallback: fc.speech.local_fallback.unwrap_or(defaults.local_fallback),
        };

        if !(0.25..=4.0).contains(&speech.tts_speed) {
            return Err(Error::Config(format!(
                "TTS speed must be between 0.25 and 4.0, got {}",
                speech.tts_speed
            )));
        }

        let default_reminders = ReminderConfig::default();
        let interval_secs = env("TASKS_REMINDER_INTERVAL_SECS")
            .and_then(|s| s.parse().ok())
            .or(fc.reminders.interval_secs);
        if interval_secs == Some(0) {
            return Err(Error::Config("reminder interval must be positive".to_string()));
        }

        let reminders = ReminderConfig {
            enabled: env("TASKS_REMINDERS")
                .map(|v| parse_bool(&v))
                .or(fc.reminders.enabled)
                .unwrap_or(default_reminders.enabled),
            interval: interval_secs.map_or(default_reminders.interval, Duration::from_secs),
            horizon: fc
                .reminders
                .horizon_hours
                .map_or(default_reminders.horizon, chrono::Duration::hours),
        };

        Ok(Self {
            data_dir,
            user_email,
            api_server,
            speech,
            reminders,
        })
    }

    /// Path of the `SQLite` database file
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("tasks.db")
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
