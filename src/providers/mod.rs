/*!
 * Provider implementations for the remote services.
 *
 * This module contains client implementations for the remote APIs:
 * - Groq: transcription and chat-completion endpoints
 * - Veo: Google video generation (asynchronous operation polling)
 * - Runway: video generation (asynchronous task polling)
 * - Fal: fal.ai video generation (single synchronous call)
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::RenderError;

/// A reference to a rendered video on the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoLocator {
    /// URL or URI the video can be fetched from
    pub url: String,
}

impl VideoLocator {
    /// Create a locator from any URL-like string
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl std::fmt::Display for VideoLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Common trait for all video render backends
///
/// This is the single capability the pipeline depends on: accept a text
/// prompt, return a video locator. The synchronous backend implements it
/// directly; the job-style backends implement it through the polling
/// adapter in [`crate::render`].
#[async_trait]
pub trait VideoBackend: Send + Sync + Debug {
    /// Short backend identifier for log lines and progress messages
    fn name(&self) -> &str;

    /// Render a video from the given prompt
    async fn render(&self, prompt: &str) -> Result<VideoLocator, RenderError>;
}

/// Opaque handle to an in-flight remote render job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(pub String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Status of a remote render job, as reported by one status fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// The job has not completed yet
    Running,
    /// The job completed; the locator is absent when the service reported
    /// completion with no result payload
    Done(Option<VideoLocator>),
    /// The service reported the job as failed
    Failed(String),
}

/// Common trait for the job-style render services
///
/// Both asynchronous backends reduce to the same two operations: submit a
/// prompt and fetch the status of the returned handle. The poll loop that
/// drives them lives in [`crate::render::PollingBackend`], not here.
#[async_trait]
pub trait JobClient: Send + Sync + Debug {
    /// Short backend identifier for log lines and progress messages
    fn name(&self) -> &str;

    /// Submit a render job, returning its handle
    async fn submit(&self, prompt: &str) -> Result<JobHandle, RenderError>;

    /// Fetch the current status of a previously submitted job
    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, RenderError>;
}

pub mod fal;
pub mod groq;
pub mod mock;
pub mod runway;
pub mod veo;
