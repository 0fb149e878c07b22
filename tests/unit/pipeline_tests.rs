/*!
 * Tests for the pipeline state machine
 */

use std::sync::Arc;

use parking_lot::Mutex;
use signwave::errors::{PipelineError, Stage};
use signwave::pipeline::{
    Pipeline, PipelineRun, PipelineState, PipelineWarning, RenderOutcome, RunInput, Submission,
};
use signwave::providers::mock::{MockGlossTranslate, MockSpeechToText, MockVideoBackend};

use crate::common::{working_pipeline, BOOK_OPEN_JSON};

#[tokio::test]
async fn test_textSubmission_shouldSkipTranscriptionStage() {
    let observed: Arc<Mutex<Vec<PipelineState>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);

    let pipeline = working_pipeline().with_observer(Arc::new(move |s| sink.lock().push(s)));

    let submission = pipeline
        .submit(RunInput::Text("Open the book".to_string()))
        .await
        .unwrap();

    assert!(matches!(submission, Submission::Run(_)));
    assert_eq!(
        *observed.lock(),
        vec![PipelineState::Reasoning, PipelineState::ReadyToRender]
    );
}

#[tokio::test]
async fn test_audioWithoutCredential_shouldStayIdleWithWarning() {
    // Transcription credential missing entirely: no transcriber attached
    let pipeline = crate::common::reasoning_only_pipeline();

    let submission = pipeline
        .submit(RunInput::Audio(vec![1, 2, 3]))
        .await
        .unwrap();

    match submission {
        Submission::Warned(warning) => {
            assert_eq!(warning, PipelineWarning::MissingTranscriptionCredential)
        }
        Submission::Run(_) => panic!("audio without credential must not start a run"),
    }
}

#[tokio::test]
async fn test_audioWithoutCredential_isWarningNotTranscriptionError() {
    let pipeline = Pipeline::new();

    let result = pipeline.submit(RunInput::Audio(vec![1, 2, 3])).await;

    // The submission succeeds with a warning; no TranscriptionError anywhere
    assert!(matches!(result, Ok(Submission::Warned(_))));
}

#[tokio::test]
async fn test_glossSummary_fromMockedBackend_shouldReadBookOpen() {
    let pipeline = working_pipeline();

    let Submission::Run(run) = pipeline
        .submit(RunInput::Text("Open the book".to_string()))
        .await
        .unwrap()
    else {
        panic!("expected a run");
    };

    assert_eq!(run.document.unwrap().summary(), "BOOK OPEN");
}

#[tokio::test]
async fn test_renderStage_requiresReadyToRender() {
    let backend = Arc::new(MockVideoBackend::returning("https://video.example/v.mp4"));
    let pipeline = Pipeline::new().with_renderer(backend.clone());

    let mut idle_run = PipelineRun::new();
    let error = pipeline.render(&mut idle_run).await.unwrap_err();

    assert!(matches!(error, PipelineError::InvalidTransition(_)));
    assert_eq!(backend.calls(), 0, "backend must not be called before READY_TO_RENDER");
}

#[tokio::test]
async fn test_renderStage_isNeverAutomatic() {
    let backend = Arc::new(MockVideoBackend::returning("https://video.example/v.mp4"));
    let pipeline = Pipeline::new()
        .with_translator(Arc::new(MockGlossTranslate::from_json(BOOK_OPEN_JSON)))
        .with_renderer(backend.clone());

    let submission = pipeline
        .submit(RunInput::Text("Open the book".to_string()))
        .await
        .unwrap();

    assert!(matches!(submission, Submission::Run(_)));
    assert_eq!(backend.calls(), 0, "submit alone must not trigger rendering");
}

#[tokio::test]
async fn test_completedRun_shouldNotRenderTwice() {
    let pipeline = working_pipeline();

    let Submission::Run(mut run) = pipeline
        .submit(RunInput::Text("Open the book".to_string()))
        .await
        .unwrap()
    else {
        panic!("expected a run");
    };

    let first = pipeline.render(&mut run).await.unwrap();
    assert!(matches!(first, RenderOutcome::Rendered(_)));
    assert_eq!(run.state(), PipelineState::Done);

    let second = pipeline.render(&mut run).await;
    assert!(matches!(second, Err(PipelineError::InvalidTransition(_))));
}

#[tokio::test]
async fn test_transcriptionFailure_shouldNotReachReasoning() {
    let translator = Arc::new(MockGlossTranslate::from_json(BOOK_OPEN_JSON));
    let pipeline = Pipeline::new()
        .with_transcriber(Arc::new(MockSpeechToText::failing()))
        .with_translator(translator.clone());

    let error = pipeline
        .submit(RunInput::Audio(vec![1, 2, 3]))
        .await
        .unwrap_err();

    assert_eq!(error.stage(), Some(Stage::Transcription));
    assert_eq!(translator.calls(), 0);
}

#[tokio::test]
async fn test_reasoningEmptyResponse_shouldFailWithReasoningStage() {
    let pipeline = Pipeline::new().with_translator(Arc::new(MockGlossTranslate::empty()));

    let error = pipeline
        .submit(RunInput::Text("hello".to_string()))
        .await
        .unwrap_err();

    assert_eq!(error.stage(), Some(Stage::Reasoning));
}

#[tokio::test]
async fn test_failedRun_shouldRecordFailureDescription() {
    let pipeline = Pipeline::new()
        .with_translator(Arc::new(MockGlossTranslate::from_json(BOOK_OPEN_JSON)))
        .with_renderer(Arc::new(MockVideoBackend::failing()));

    let Submission::Run(mut run) = pipeline
        .submit(RunInput::Text("Open the book".to_string()))
        .await
        .unwrap()
    else {
        panic!("expected a run");
    };

    let _ = pipeline.render(&mut run).await.unwrap_err();

    assert_eq!(run.state(), PipelineState::Failed);
    let failure = run.failure.unwrap();
    assert!(failure.contains("rendering"));
}
