/*!
 * Video rendering: a gloss document's rendering prompt to a playable video.
 *
 * Three interchangeable backends sit behind the [`VideoBackend`] trait. The
 * synchronous backend (fal) implements it directly; the two job-style
 * backends (Veo, Runway) are wrapped in [`PollingBackend`], which drives a
 * bounded sleep-then-check loop and reports coarse progress.
 */

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use crate::app_config::{RenderConfig, RenderProvider};
use crate::credentials::{CredentialStore, Service};
use crate::errors::RenderError;
use crate::providers::fal::Fal;
use crate::providers::runway::Runway;
use crate::providers::veo::Veo;
use crate::providers::{JobClient, JobStatus, VideoBackend, VideoLocator};

/// Lifecycle of one remote render job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoJobState {
    /// The job was accepted by the remote service
    Submitted,
    /// The job is in flight; polling continues
    Running,
    /// The job completed with a video locator
    Done,
    /// The job failed or was abandoned
    Failed,
}

/// One coarse progress update from the poll loop
#[derive(Debug, Clone)]
pub struct RenderProgress {
    /// Current job state
    pub state: VideoJobState,
    /// Status polls performed so far
    pub attempt: u32,
    /// Poll budget for this job
    pub max_attempts: u32,
}

/// Observer invoked on every job state change and poll
pub type ProgressObserver = Arc<dyn Fn(RenderProgress) + Send + Sync>;

/// Adapter that turns a job-style client into a [`VideoBackend`].
///
/// The loop sleeps a fixed interval, re-fetches job status, and reports
/// progress, until the job completes or the poll budget runs out.
pub struct PollingBackend<C: JobClient> {
    client: C,
    poll_interval: Duration,
    max_attempts: u32,
    observer: Option<ProgressObserver>,
}

impl<C: JobClient> std::fmt::Debug for PollingBackend<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingBackend")
            .field("client", &self.client)
            .field("poll_interval", &self.poll_interval)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl<C: JobClient> PollingBackend<C> {
    /// Create a polling adapter around the given job client
    pub fn new(client: C, poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            client,
            poll_interval,
            max_attempts,
            observer: None,
        }
    }

    /// Attach a progress observer
    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    fn notify(&self, state: VideoJobState, attempt: u32) {
        if let Some(observer) = &self.observer {
            observer(RenderProgress {
                state,
                attempt,
                max_attempts: self.max_attempts,
            });
        }
    }
}

#[async_trait]
impl<C: JobClient> VideoBackend for PollingBackend<C> {
    fn name(&self) -> &str {
        self.client.name()
    }

    async fn render(&self, prompt: &str) -> Result<VideoLocator, RenderError> {
        let handle = self.client.submit(prompt).await?;
        info!("{} job {} submitted", self.client.name(), handle.id());
        self.notify(VideoJobState::Submitted, 0);

        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.poll_interval).await;

            match self.client.status(&handle).await {
                Ok(JobStatus::Running) => {
                    debug!(
                        "{} job {} still running (poll {}/{})",
                        self.client.name(),
                        handle.id(),
                        attempt,
                        self.max_attempts
                    );
                    self.notify(VideoJobState::Running, attempt);
                }
                Ok(JobStatus::Done(Some(locator))) => {
                    info!("{} job {} complete: {}", self.client.name(), handle.id(), locator);
                    self.notify(VideoJobState::Done, attempt);
                    return Ok(locator);
                }
                Ok(JobStatus::Done(None)) => {
                    self.notify(VideoJobState::Failed, attempt);
                    return Err(RenderError::EmptyResult);
                }
                Ok(JobStatus::Failed(message)) => {
                    self.notify(VideoJobState::Failed, attempt);
                    return Err(RenderError::JobFailed(message));
                }
                Err(e) => {
                    self.notify(VideoJobState::Failed, attempt);
                    return Err(e);
                }
            }
        }

        self.notify(VideoJobState::Failed, self.max_attempts);
        Err(RenderError::Timeout {
            attempts: self.max_attempts,
        })
    }
}

/// Fixed framing applied to every rendering prompt before submission
pub fn frame_prompt(rendering_prompt: &str) -> String {
    format!(
        "Cinematic 4k video of an Indian sign language instructor, soft lighting, \
         clean studio background. {}. 720p.",
        rendering_prompt.trim().trim_end_matches('.')
    )
}

/// The credential service a render provider depends on
pub fn service_for(provider: RenderProvider) -> Service {
    match provider {
        RenderProvider::Veo => Service::Veo,
        RenderProvider::Runway => Service::Runway,
        RenderProvider::Fal => Service::Fal,
    }
}

/// Build the configured render backend.
/// Returns `None` when the backend's credential is not available; the
/// caller treats that as a precondition warning, not an error.
pub fn build_backend(
    config: &RenderConfig,
    credentials: &CredentialStore,
    observer: Option<ProgressObserver>,
) -> Option<Arc<dyn VideoBackend>> {
    let api_key = credentials.get(service_for(config.provider))?.to_string();
    let poll_interval = Duration::from_secs(config.poll_interval_secs);

    let backend: Arc<dyn VideoBackend> = match config.provider {
        RenderProvider::Veo => {
            let client = Veo::new(
                api_key,
                config.backends.veo_endpoint.clone(),
                config.backends.veo_model.clone(),
                config.aspect_ratio.clone(),
                config.timeout_secs,
            );
            let mut polling = PollingBackend::new(client, poll_interval, config.max_poll_attempts);
            if let Some(observer) = observer {
                polling = polling.with_observer(observer);
            }
            Arc::new(polling)
        }
        RenderProvider::Runway => {
            let client = Runway::new(
                api_key,
                config.backends.runway_endpoint.clone(),
                config.backends.runway_model.clone(),
                config.aspect_ratio.clone(),
                config.timeout_secs,
            );
            let mut polling = PollingBackend::new(client, poll_interval, config.max_poll_attempts);
            if let Some(observer) = observer {
                polling = polling.with_observer(observer);
            }
            Arc::new(polling)
        }
        RenderProvider::Fal => Arc::new(Fal::new(
            api_key,
            config.backends.fal_endpoint.clone(),
            config.backends.fal_model.clone(),
            config.aspect_ratio.clone(),
            config.timeout_secs,
        )),
    };

    Some(backend)
}
