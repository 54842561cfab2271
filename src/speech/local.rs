//! On-device speech synthesis through a system command

use std::path::PathBuf;

use async_trait::async_trait;

use super::Speaker;
use crate::{Error, Result};

/// Synthesizers tried in order, with arguments selecting a Spanish voice
const SYNTHESIZERS: &[(&str, &[&str])] = &[
    ("espeak-ng", &["-v", "es"]),
    ("espeak", &["-v", "es"]),
    ("say", &["-v", "Monica"]),
];

/// Speaks with espeak-ng, espeak or macOS `say`
pub struct LocalSpeaker {
    program: PathBuf,
    args: &'static [&'static str],
}

impl LocalSpeaker {
    /// Find the first installed synthesizer
    #[must_use]
    pub fn detect() -> Option<Self> {
        SYNTHESIZERS.iter().find_map(|(bin, args)| {
            which::which(bin).ok().map(|program| {
                tracing::debug!(program = %program.display(), "local synthesizer found");
                Self {
                    program,
                    args: *args,
                }
            })
        })
    }
}

#[async_trait]
impl Speaker for LocalSpeaker {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn speak(&self, text: &str) -> Result<()> {
        let output = tokio::process::Command::new(&self.program)
            .args(self.args)
            .arg(text)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Speech(format!(
                "{} failed: {}",
                self.program.display(),
                stderr.trim()
            )));
        }

        Ok(())
    }
}
