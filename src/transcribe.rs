/*!
 * Speech-to-text: raw audio bytes to recognized text.
 *
 * The transcription endpoint requires a named, seekable resource, so the
 * payload is staged in a temporary file for the duration of one call. The
 * staging file is tied to the scope of the call and removed on every exit
 * path.
 */

use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::app_config::TranscriptionConfig;
use crate::errors::TranscriptionError;
use crate::providers::groq::Groq;

/// Audio payload staged on disk for one transcription call.
/// The backing file is removed when this value drops.
pub struct StagedAudio {
    file: NamedTempFile,
}

impl StagedAudio {
    /// Write the payload to a fresh temporary file in the system temp dir
    pub fn persist(audio: &[u8]) -> Result<Self, TranscriptionError> {
        Self::persist_in(audio, std::env::temp_dir().as_path())
    }

    /// Write the payload to a fresh temporary file in the given directory
    pub fn persist_in(audio: &[u8], dir: &Path) -> Result<Self, TranscriptionError> {
        let mut file = tempfile::Builder::new()
            .prefix("signwave-audio-")
            .suffix(".wav")
            .tempfile_in(dir)?;
        file.write_all(audio)?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Path of the staging file, valid until drop
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Common trait for speech-to-text implementations
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a raw audio payload into plain text
    async fn transcribe(&self, audio: &[u8]) -> Result<String, TranscriptionError>;
}

/// Speech-to-text adapter backed by the Groq transcription endpoint
pub struct GroqTranscriber {
    client: Groq,
    config: TranscriptionConfig,
}

impl GroqTranscriber {
    /// Create a transcriber with an explicitly supplied API key
    pub fn new(api_key: impl Into<String>, config: TranscriptionConfig) -> Self {
        let client = Groq::new(api_key, config.endpoint.clone(), config.timeout_secs);
        Self { client, config }
    }

    fn stage(&self, audio: &[u8]) -> Result<StagedAudio, TranscriptionError> {
        match &self.config.staging_dir {
            Some(dir) => StagedAudio::persist_in(audio, dir),
            None => StagedAudio::persist(audio),
        }
    }
}

#[async_trait]
impl SpeechToText for GroqTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, TranscriptionError> {
        let staged = self.stage(audio)?;
        // `staged` drops when this function returns, releasing the buffer
        // whether the remote call succeeded or failed
        self.client
            .transcribe_file(staged.path(), &self.config.model)
            .await
    }
}
