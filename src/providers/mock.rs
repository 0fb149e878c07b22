/*!
 * Mock provider implementations for testing.
 *
 * This module provides mocks for every remote seam in the pipeline:
 * - `MockSpeechToText` - scripted transcription results
 * - `MockGlossTranslate` - scripted gloss documents or failures
 * - `MockJobClient` - scripted job status sequences for the poll loop
 * - `MockVideoBackend` - scripted render results with call counting
 */

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::{ReasoningError, RenderError, TranscriptionError};
use crate::gloss::{parse_gloss_document, GlossDocument, GlossTranslate};
use crate::providers::{JobClient, JobHandle, JobStatus, VideoBackend, VideoLocator};
use crate::transcribe::SpeechToText;

/// Mock speech-to-text implementation
pub struct MockSpeechToText {
    /// Text returned on success, `None` to fail every call
    transcript: Option<String>,
    /// Number of transcribe calls made
    call_count: Arc<AtomicUsize>,
}

impl MockSpeechToText {
    /// Create a mock that always returns the given transcript
    pub fn returning(transcript: impl Into<String>) -> Self {
        Self {
            transcript: Some(transcript.into()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always fails
    pub fn failing() -> Self {
        Self {
            transcript: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of transcribe calls made so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait]
impl SpeechToText for MockSpeechToText {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String, TranscriptionError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match &self.transcript {
            Some(text) => Ok(text.clone()),
            None => Err(TranscriptionError::Api {
                status_code: 500,
                message: "Simulated transcription failure".to_string(),
            }),
        }
    }
}

/// Behavior mode for the mock gloss translator
enum MockGlossBehavior {
    /// Always succeeds with the given document
    Working(GlossDocument),
    /// Always fails with an API error
    Failing,
    /// Simulates a structurally invalid model payload
    Malformed,
    /// Simulates a successful reply with no content
    Empty,
}

/// Mock gloss translator
pub struct MockGlossTranslate {
    behavior: MockGlossBehavior,
    call_count: Arc<AtomicUsize>,
}

impl MockGlossTranslate {
    /// Create a mock that always returns the given document
    pub fn returning(document: GlossDocument) -> Self {
        Self {
            behavior: MockGlossBehavior::Working(document),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock from a raw JSON payload, parsed through the real schema
    pub fn from_json(content: &str) -> Self {
        Self::returning(parse_gloss_document(content).expect("mock payload must parse"))
    }

    /// Create a mock that always fails with an API error
    pub fn failing() -> Self {
        Self {
            behavior: MockGlossBehavior::Failing,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that simulates a malformed model payload
    pub fn malformed() -> Self {
        Self {
            behavior: MockGlossBehavior::Malformed,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that simulates an empty completion
    pub fn empty() -> Self {
        Self {
            behavior: MockGlossBehavior::Empty,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of translate calls made so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GlossTranslate for MockGlossTranslate {
    async fn translate(&self, _text: &str) -> Result<GlossDocument, ReasoningError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockGlossBehavior::Working(document) => Ok(document.clone()),
            MockGlossBehavior::Failing => Err(ReasoningError::Api {
                status_code: 500,
                message: "Simulated reasoning failure".to_string(),
            }),
            MockGlossBehavior::Malformed => parse_gloss_document("{ \"spoken_text\": \"only\" }"),
            MockGlossBehavior::Empty => Err(ReasoningError::EmptyResponse),
        }
    }
}

/// Mock job client returning a scripted sequence of statuses
#[derive(Debug)]
pub struct MockJobClient {
    /// Statuses handed out in order; when exhausted the job stays running
    script: Mutex<VecDeque<JobStatus>>,
    /// Whether submit itself should fail
    fail_submit: bool,
    /// Whether every status fetch should fail at the transport level
    fail_status: bool,
    submit_count: Arc<AtomicUsize>,
    status_count: Arc<AtomicUsize>,
}

impl MockJobClient {
    /// Create a mock whose status calls walk through the given script
    pub fn from_script(script: Vec<JobStatus>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fail_submit: false,
            fail_status: false,
            submit_count: Arc::new(AtomicUsize::new(0)),
            status_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock whose job never completes
    pub fn always_running() -> Self {
        Self::from_script(Vec::new())
    }

    /// Create a mock whose submit call fails
    pub fn failing_submit() -> Self {
        Self {
            fail_submit: true,
            ..Self::from_script(Vec::new())
        }
    }

    /// Create a mock whose status fetches fail at the transport level
    pub fn failing_status() -> Self {
        Self {
            fail_status: true,
            ..Self::from_script(Vec::new())
        }
    }

    /// Number of submit calls made so far
    pub fn submits(&self) -> usize {
        self.submit_count.load(Ordering::SeqCst)
    }

    /// Number of status calls made so far
    pub fn polls(&self) -> usize {
        self.status_count.load(Ordering::SeqCst)
    }

    /// Shared handle to the status counter
    pub fn poll_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.status_count)
    }
}

#[async_trait]
impl JobClient for MockJobClient {
    fn name(&self) -> &str {
        "mock-job"
    }

    async fn submit(&self, _prompt: &str) -> Result<JobHandle, RenderError> {
        self.submit_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_submit {
            return Err(RenderError::Api {
                status_code: 401,
                message: "Simulated submit failure".to_string(),
            });
        }
        Ok(JobHandle::new("mock-job-1"))
    }

    async fn status(&self, _handle: &JobHandle) -> Result<JobStatus, RenderError> {
        self.status_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_status {
            return Err(RenderError::Request(
                "Simulated status transport failure".to_string(),
            ));
        }
        Ok(self
            .script
            .lock()
            .pop_front()
            .unwrap_or(JobStatus::Running))
    }
}

/// Mock video backend with call counting
#[derive(Debug)]
pub struct MockVideoBackend {
    /// Locator returned on success, `None` to fail every call
    locator: Option<VideoLocator>,
    call_count: Arc<AtomicUsize>,
}

impl MockVideoBackend {
    /// Create a mock that always returns the given locator
    pub fn returning(url: impl Into<String>) -> Self {
        Self {
            locator: Some(VideoLocator::new(url)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always fails
    pub fn failing() -> Self {
        Self {
            locator: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of render calls made so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait]
impl VideoBackend for MockVideoBackend {
    fn name(&self) -> &str {
        "mock-video"
    }

    async fn render(&self, _prompt: &str) -> Result<VideoLocator, RenderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match &self.locator {
            Some(locator) => Ok(locator.clone()),
            None => Err(RenderError::JobFailed(
                "Simulated render failure".to_string(),
            )),
        }
    }
}
