//! Cloud text-to-speech (`OpenAI`) with local MP3 playback

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;

use super::Speaker;
use crate::config::SpeechConfig;
use crate::{Error, Result};

const OPENAI_SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";

/// Synthesizes speech from text
#[derive(Clone)]
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    speed: f32,
    model: String,
}

impl TextToSpeech {
    /// Create a TTS client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: String, voice: String, speed: f32, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("OpenAI API key required for TTS".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            speed,
            model,
        })
    }

    /// Build from configuration; `None` when no API key is set
    #[must_use]
    pub fn from_config(config: &SpeechConfig) -> Option<Self> {
        let key = config.openai_api_key.clone()?;
        Self::new(
            key,
            config.tts_voice.clone(),
            config.tts_speed,
            config.tts_model.clone(),
        )
        .ok()
    }

    /// Synthesize text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the service rejects it
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let response = self
            .client
            .post(OPENAI_SPEECH_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        tracing::debug!(bytes = audio.len(), voice = %self.voice, "synthesized speech");
        Ok(audio.to_vec())
    }
}

/// Command-line players able to play an MP3 file, in preference order
const PLAYERS: &[(&str, &[&str])] = &[
    ("mpv", &["--really-quiet", "--no-video"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("afplay", &[]),
];

/// Speaks through cloud TTS and a local audio player
pub struct CloudSpeaker {
    tts: TextToSpeech,
    player: (PathBuf, &'static [&'static str]),
}

impl CloudSpeaker {
    /// Pair a TTS client with the first available audio player
    ///
    /// # Errors
    ///
    /// Returns error if no supported player is installed
    pub fn new(tts: TextToSpeech) -> Result<Self> {
        let player = PLAYERS
            .iter()
            .find_map(|(bin, args)| which::which(bin).ok().map(|path| (path, *args)))
            .ok_or_else(|| Error::Speech("no audio player found (mpv, ffplay, afplay)".to_string()))?;

        tracing::debug!(player = %player.0.display(), "cloud speech player selected");
        Ok(Self { tts, player })
    }
}

#[async_trait]
impl Speaker for CloudSpeaker {
    fn name(&self) -> &'static str {
        "cloud"
    }

    async fn speak(&self, text: &str) -> Result<()> {
        let audio = self.tts.synthesize(text).await?;

        let mut file = tempfile::Builder::new()
            .prefix("voice-tasks-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(&audio)?;
        file.flush()?;

        let (program, args) = &self.player;
        let status = tokio::process::Command::new(program)
            .args(*args)
            .arg(file.path())
            .status()
            .await?;

        if !status.success() {
            return Err(Error::Speech(format!(
                "{} exited with code {}",
                program.display(),
                status.code().unwrap_or(-1)
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let result = TextToSpeech::new(String::new(), "alloy".into(), 1.0, "tts-1".into());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_config_without_key() {
        assert!(TextToSpeech::from_config(&SpeechConfig::default()).is_none());

        let config = SpeechConfig {
            openai_api_key: Some("sk-test".to_string()),
            ..SpeechConfig::default()
        };
        assert!(TextToSpeech::from_config(&config).is_some());
    }
}
