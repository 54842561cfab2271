//! Speech output
//!
//! Replies are spoken through the first speaker that works: cloud TTS, then
//! a local synthesizer, then the log.

mod cloud;
mod local;

use async_trait::async_trait;

pub use cloud::{CloudSpeaker, TextToSpeech};
pub use local::LocalSpeaker;

use crate::Result;
use crate::config::SpeechConfig;

/// Something that can say a sentence out loud
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// Speak `text`, returning once playback has finished
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Writes speech to the log; never fails
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSpeaker;

#[async_trait]
impl Speaker for LogSpeaker {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn speak(&self, text: &str) -> Result<()> {
        tracing::info!(text, "speech");
        Ok(())
    }
}

/// Tries each speaker in turn until one succeeds
pub struct FallbackSpeaker {
    speakers: Vec<Box<dyn Speaker>>,
}

impl FallbackSpeaker {
    #[must_use]
    pub fn new(speakers: Vec<Box<dyn Speaker>>) -> Self {
        Self { speakers }
    }

    /// Assemble the chain from configuration and what is installed
    #[must_use]
    pub fn from_config(config: &SpeechConfig) -> Self {
        let mut speakers: Vec<Box<dyn Speaker>> = Vec::new();

        if let Some(tts) = TextToSpeech::from_config(config) {
            match CloudSpeaker::new(tts) {
                Ok(speaker) => speakers.push(Box::new(speaker)),
                Err(e) => tracing::warn!(error = %e, "cloud speech unavailable"),
            }
        }

        if let Some(speaker) = config.local_fallback.then(LocalSpeaker::detect).flatten() {
            speakers.push(Box::new(speaker));
        }

        speakers.push(Box::new(LogSpeaker));

        let names: Vec<_> = speakers.iter().map(|s| s.name()).collect();
        tracing::debug!(speakers = ?names, "speech chain ready");

        Self { speakers }
    }

    /// Names of the speakers in the chain
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.speakers.iter().map(|s| s.name()).collect()
    }
}

#[async_trait]
impl Speaker for FallbackSpeaker {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn speak(&self, text: &str) -> Result<()> {
        let mut last_error = None;

        for speaker in &self.speakers {
            match speaker.speak(text).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(speaker = speaker.name(), error = %e, "speaker failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        last_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Error;

    struct Broken(Arc<AtomicUsize>);

    #[async_trait]
    impl Speaker for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn speak(&self, _text: &str) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(Error::Speech("no device".to_string()))
        }
    }

    #[tokio::test]
    async fn test_falls_through_to_working_speaker() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = FallbackSpeaker::new(vec![
            Box::new(Broken(Arc::clone(&calls))),
            Box::new(LogSpeaker),
        ]);

        chain.speak("Tarea creada: comprar pan").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(chain.names(), vec!["broken", "log"]);
    }

    #[tokio::test]
    async fn test_reports_last_error_when_all_fail() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = FallbackSpeaker::new(vec![
            Box::new(Broken(Arc::clone(&calls))),
            Box::new(Broken(Arc::clone(&calls))),
        ]);

        assert!(matches!(chain.speak("hola").await, Err(Error::Speech(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_chain_always_ends_with_log() {
        let config = SpeechConfig {
            local_fallback: false,
            ..SpeechConfig::default()
        };
        assert_eq!(FallbackSpeaker::from_config(&config).names(), vec!["log"]);
    }
}
