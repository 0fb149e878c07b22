/*!
 * Pipeline orchestrator for one transcribe → reason → render run.
 *
 * The three adapters run strictly in sequence; the orchestrator holds the
 * partial results, drives the state machine, and attributes every failure
 * to its originating stage. Nothing is retried automatically: a failed run
 * can only be replaced by submitting new input. Rendering never starts on
 * its own — it waits for an explicit trigger once a run is ready.
 */

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::gloss::{GlossDocument, GlossTranslate};
use crate::providers::{VideoBackend, VideoLocator};
use crate::render::frame_prompt;
use crate::transcribe::SpeechToText;

/// States a pipeline run moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Transcribing,
    Reasoning,
    ReadyToRender,
    Rendering,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Transcribing => "transcribing",
            Self::Reasoning => "reasoning",
            Self::ReadyToRender => "ready-to-render",
            Self::Rendering => "rendering",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Input for one pipeline run
#[derive(Debug, Clone)]
pub enum RunInput {
    /// English text, skips the transcription stage
    Text(String),
    /// Raw audio payload for the transcription stage
    Audio(Vec<u8>),
}

/// Precondition warnings: a stage's credential is not configured.
/// These are not errors; the run is simply not started (or not advanced).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineWarning {
    MissingTranscriptionCredential,
    MissingReasoningCredential,
    MissingRenderCredential,
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTranscriptionCredential => {
                write!(f, "no transcription credential configured; audio input unavailable")
            }
            Self::MissingReasoningCredential => {
                write!(f, "no reasoning credential configured; translation unavailable")
            }
            Self::MissingRenderCredential => {
                write!(f, "no render credential configured; video generation unavailable")
            }
        }
    }
}

/// Result of submitting input to the pipeline
#[derive(Debug)]
pub enum Submission {
    /// A precondition was not met; no remote work was attempted for the
    /// missing stage and the state machine stayed where it was
    Warned(PipelineWarning),
    /// A run was executed up to READY_TO_RENDER or FAILED
    Run(PipelineRun),
}

/// One pipeline run and its accumulated partial results
#[derive(Debug)]
pub struct PipelineRun {
    /// Unique run identifier
    pub id: Uuid,
    /// When the run was started
    pub started_at: DateTime<Utc>,
    state: PipelineState,
    /// Recognized or typed English text
    pub transcript: Option<String>,
    /// Structured translation output
    pub document: Option<GlossDocument>,
    /// Rendered video reference
    pub video: Option<VideoLocator>,
    /// Description of the failure that ended the run, if any
    pub failure: Option<String>,
}

impl PipelineRun {
    /// Create a fresh run in the idle state
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: PipelineState::Idle,
            transcript: None,
            document: None,
            video: None,
            failure: None,
        }
    }

    /// Current state of this run
    pub fn state(&self) -> PipelineState {
        self.state
    }
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer invoked on every state transition
pub type StateObserver = Arc<dyn Fn(PipelineState) + Send + Sync>;

/// The pipeline orchestrator.
///
/// Adapters are optional: an absent adapter means the corresponding
/// credential was never resolved, and the stage that needs it reports a
/// precondition warning instead of running.
pub struct Pipeline {
    transcriber: Option<Arc<dyn SpeechToText>>,
    translator: Option<Arc<dyn GlossTranslate>>,
    renderer: Option<Arc<dyn VideoBackend>>,
    observer: Option<StateObserver>,
}

impl Pipeline {
    /// Create an empty pipeline; attach adapters with the builder methods
    pub fn new() -> Self {
        Self {
            transcriber: None,
            translator: None,
            renderer: None,
            observer: None,
        }
    }

    /// Attach the speech-to-text adapter
    pub fn with_transcriber(mut self, transcriber: Arc<dyn SpeechToText>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Attach the gloss translator
    pub fn with_translator(mut self, translator: Arc<dyn GlossTranslate>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Attach the video render backend
    pub fn with_renderer(mut self, renderer: Arc<dyn VideoBackend>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Attach a state transition observer
    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Whether audio input can currently be accepted
    pub fn can_transcribe(&self) -> bool {
        self.transcriber.is_some()
    }

    /// Whether the render stage can currently be triggered
    pub fn can_render(&self) -> bool {
        self.renderer.is_some()
    }

    fn transition(&self, run: &mut PipelineRun, state: PipelineState) {
        run.state = state;
        if let Some(observer) = &self.observer {
            observer(state);
        }
    }

    fn fail(&self, run: &mut PipelineRun, error: PipelineError) -> PipelineError {
        run.failure = Some(error.to_string());
        self.transition(run, PipelineState::Failed);
        if let Some(stage) = error.stage() {
            warn!("run {} failed in {} stage: {}", run.id, stage, error);
        }
        error
    }

    /// Run the pipeline on the given input, up to READY_TO_RENDER.
    ///
    /// Returns `Submission::Warned` without touching any remote service
    /// when a required credential is missing. Stage failures end the run:
    /// the returned run is in the FAILED state and the error is reported
    /// alongside it.
    pub async fn submit(&self, input: RunInput) -> Result<Submission, PipelineError> {
        let mut run = PipelineRun::new();

        let text = match input {
            RunInput::Audio(audio) => {
                let Some(transcriber) = &self.transcriber else {
                    warn!("{}", PipelineWarning::MissingTranscriptionCredential);
                    return Ok(Submission::Warned(
                        PipelineWarning::MissingTranscriptionCredential,
                    ));
                };
                if self.translator.is_none() {
                    warn!("{}", PipelineWarning::MissingReasoningCredential);
                    return Ok(Submission::Warned(PipelineWarning::MissingReasoningCredential));
                }

                self.transition(&mut run, PipelineState::Transcribing);
                match transcriber.transcribe(&audio).await {
                    Ok(text) => {
                        info!("run {} transcribed {} bytes of audio", run.id, audio.len());
                        run.transcript = Some(text.clone());
                        text
                    }
                    Err(e) => {
                        return Err(self.fail(&mut run, PipelineError::Transcription(e)));
                    }
                }
            }
            RunInput::Text(text) => {
                run.transcript = Some(text.clone());
                text
            }
        };

        let Some(translator) = &self.translator else {
            warn!("{}", PipelineWarning::MissingReasoningCredential);
            return Ok(Submission::Warned(PipelineWarning::MissingReasoningCredential));
        };

        self.transition(&mut run, PipelineState::Reasoning);
        match translator.translate(&text).await {
            Ok(document) => {
                info!("run {} produced gloss: {}", run.id, document.summary());
                run.document = Some(document);
                self.transition(&mut run, PipelineState::ReadyToRender);
                Ok(Submission::Run(run))
            }
            Err(e) => Err(self.fail(&mut run, PipelineError::Reasoning(e))),
        }
    }

    /// Trigger the render stage for a run that reached READY_TO_RENDER.
    ///
    /// Rendering in any other state is an invalid transition and no backend
    /// call is made. A missing render credential leaves the run untouched
    /// and reports a warning.
    pub async fn render(
        &self,
        run: &mut PipelineRun,
    ) -> Result<RenderOutcome, PipelineError> {
        if run.state != PipelineState::ReadyToRender {
            return Err(PipelineError::InvalidTransition(format!(
                "render requested in state {}, requires {}",
                run.state,
                PipelineState::ReadyToRender
            )));
        }

        let Some(renderer) = &self.renderer else {
            warn!("{}", PipelineWarning::MissingRenderCredential);
            return Ok(RenderOutcome::Warned(PipelineWarning::MissingRenderCredential));
        };

        let prompt = match &run.document {
            Some(document) => frame_prompt(&document.rendering_prompt),
            None => {
                return Err(PipelineError::InvalidTransition(
                    "run is ready to render but holds no document".to_string(),
                ));
            }
        };

        self.transition(run, PipelineState::Rendering);
        match renderer.render(&prompt).await {
            Ok(locator) => {
                info!("run {} rendered video: {}", run.id, locator);
                run.video = Some(locator.clone());
                self.transition(run, PipelineState::Done);
                Ok(RenderOutcome::Rendered(locator))
            }
            Err(e) => Err(self.fail(run, PipelineError::Rendering(e))),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a render trigger
#[derive(Debug)]
pub enum RenderOutcome {
    /// The render credential is missing; the run stayed READY_TO_RENDER
    Warned(PipelineWarning),
    /// The video was rendered
    Rendered(VideoLocator),
}
