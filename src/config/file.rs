//! TOML configuration file loading
//!
//! Supports `~/.config/voice-tasks/config.toml` as a persistent config source.
//! Every field is optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Directory holding the task database
    pub data_dir: Option<String>,

    /// Email of the user whose tasks this instance manages
    pub user: Option<String>,

    /// HTTP API configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Speech output configuration
    #[serde(default)]
    pub speech: SpeechFileConfig,

    /// Due-date reminders
    #[serde(default)]
    pub reminders: RemindersFileConfig,
}

/// HTTP API configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    pub port: Option<u16>,

    /// Bearer token required on `/api/*`
    pub api_key: Option<String>,
}

/// Speech output configuration
#[derive(Debug, Default, Deserialize)]
pub struct SpeechFileConfig {
    /// `OpenAI` key for cloud TTS
    pub openai_api_key: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,

    /// Allow espeak-ng / say when cloud TTS is unavailable
    pub local_fallback: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RemindersFileConfig {
    pub enabled: Option<bool>,
    pub interval_secs: Option<u64>,
    pub horizon_hours: Option<i64>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ConfigFile {
    config_file_path().map_or_else(ConfigFile::default, |path| load_from(&path))
}

/// Load a config file from an explicit path, falling back to defaults
pub fn load_from(path: &Path) -> ConfigFile {
    if !path.exists() {
        return ConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/voice-tasks/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("voice-tasks").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_parses() {
        let fc: ConfigFile = toml::from_str(
            r#"
            user = "ana@example.com"

            [speech]
            tts_voice = "nova"
            "#,
        )
        .unwrap();

        assert_eq!(fc.user.as_deref(), Some("ana@example.com"));
        assert_eq!(fc.speech.tts_voice.as_deref(), Some("nova"));
        assert!(fc.server.port.is_none());
        assert!(fc.reminders.enabled.is_none());
    }

    #[test]
    fn test_missing_and_broken_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_from(&dir.path().join("config.toml"));
        assert!(missing.user.is_none());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "user = [").unwrap();
        assert!(load_from(&broken).user.is_none());

        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[server]\nport = 9000\n").unwrap();
        assert_eq!(load_from(&good).server.port, Some(9000));
    }
}
