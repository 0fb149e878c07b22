/*!
 * End-to-end pipeline workflow tests: mock adapters on every remote seam,
 * real orchestration, real poll loop.
 */

use std::sync::Arc;
use std::time::Duration;

use signwave::errors::{PipelineError, RenderError};
use signwave::gloss::GlossTranslate;
use signwave::pipeline::{Pipeline, PipelineState, RenderOutcome, RunInput, Submission};
use signwave::providers::mock::{MockGlossTranslate, MockJobClient, MockSpeechToText};
use signwave::providers::{JobStatus, VideoLocator};
use signwave::render::PollingBackend;

use crate::common::BOOK_OPEN_JSON;

fn job_pipeline(client: MockJobClient, max_attempts: u32) -> Pipeline {
    Pipeline::new()
        .with_transcriber(Arc::new(MockSpeechToText::returning("Open the book")))
        .with_translator(Arc::new(MockGlossTranslate::from_json(BOOK_OPEN_JSON)))
        .with_renderer(Arc::new(PollingBackend::new(
            client,
            Duration::from_millis(1),
            max_attempts,
        )))
}

#[tokio::test]
async fn test_audioToVideo_workflow_shouldCompleteThroughAllStages() {
    let client = MockJobClient::from_script(vec![
        JobStatus::Running,
        JobStatus::Running,
        JobStatus::Done(Some(VideoLocator::new("https://video.example/signed.mp4"))),
    ]);
    let polls = client.poll_counter();
    let pipeline = job_pipeline(client, 60);

    let Submission::Run(mut run) = pipeline
        .submit(RunInput::Audio(vec![0u8; 2048]))
        .await
        .unwrap()
    else {
        panic!("expected a run");
    };

    assert_eq!(run.state(), PipelineState::ReadyToRender);
    assert_eq!(run.transcript.as_deref(), Some("Open the book"));

    let outcome = pipeline.render(&mut run).await.unwrap();
    let RenderOutcome::Rendered(locator) = outcome else {
        panic!("expected a rendered video");
    };

    assert_eq!(locator.url, "https://video.example/signed.mp4");
    assert_eq!(run.state(), PipelineState::Done);
    assert_eq!(polls.load(std::sync::atomic::Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_workflow_jobCompletesEmpty_shouldFailNotComplete() {
    let client = MockJobClient::from_script(vec![JobStatus::Done(None)]);
    let pipeline = job_pipeline(client, 60);

    let Submission::Run(mut run) = pipeline
        .submit(RunInput::Text("Open the book".to_string()))
        .await
        .unwrap()
    else {
        panic!("expected a run");
    };

    let error = pipeline.render(&mut run).await.unwrap_err();

    assert!(matches!(
        error,
        PipelineError::Rendering(RenderError::EmptyResult)
    ));
    assert_eq!(run.state(), PipelineState::Failed);
    assert!(run.video.is_none());
}

#[tokio::test]
async fn test_workflow_jobNeverCompletes_shouldTimeOutAndFailRun() {
    let client = MockJobClient::always_running();
    let pipeline = job_pipeline(client, 5);

    let Submission::Run(mut run) = pipeline
        .submit(RunInput::Text("Open the book".to_string()))
        .await
        .unwrap()
    else {
        panic!("expected a run");
    };

    let error = pipeline.render(&mut run).await.unwrap_err();

    assert!(matches!(
        error,
        PipelineError::Rendering(RenderError::Timeout { attempts: 5 })
    ));
    assert_eq!(run.state(), PipelineState::Failed);
}

#[tokio::test]
async fn test_workflow_failedRun_requiresFullResubmission() {
    let pipeline = Pipeline::new().with_translator(Arc::new(MockGlossTranslate::malformed()));

    // First submission fails during reasoning
    let error = pipeline
        .submit(RunInput::Text("Open the book".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(error, PipelineError::Reasoning(_)));

    // Recovery is a fresh submission, not a retry of the failed run
    let pipeline =
        Pipeline::new().with_translator(Arc::new(MockGlossTranslate::from_json(BOOK_OPEN_JSON)));
    let submission = pipeline
        .submit(RunInput::Text("Open the book".to_string()))
        .await
        .unwrap();
    assert!(matches!(submission, Submission::Run(_)));
}

#[tokio::test]
async fn test_workflow_documentIsImmutableAcrossRender() {
    let client = MockJobClient::from_script(vec![JobStatus::Done(Some(VideoLocator::new(
        "https://video.example/v.mp4",
    )))]);
    let pipeline = job_pipeline(client, 60);

    let Submission::Run(mut run) = pipeline
        .submit(RunInput::Text("Open the book".to_string()))
        .await
        .unwrap()
    else {
        panic!("expected a run");
    };

    let before = run.document.clone().unwrap();
    pipeline.render(&mut run).await.unwrap();
    let after = run.document.clone().unwrap();

    assert_eq!(before, after);
}

#[tokio::test]
async fn test_workflow_sequentialStages_eachConsumesPredecessorOutput() {
    // The translator receives exactly the transcriber's output
    struct EchoTranslate;

    #[async_trait::async_trait]
    impl GlossTranslate for EchoTranslate {
        async fn translate(
            &self,
            text: &str,
        ) -> Result<signwave::GlossDocument, signwave::ReasoningError> {
            signwave::gloss::parse_gloss_document(&format!(
                r#"{{
                    "spoken_text": "{}",
                    "isl_gloss": "ECHO",
                    "rendering_prompt": "echo"
                }}"#,
                text
            ))
        }
    }

    let pipeline = Pipeline::new()
        .with_transcriber(Arc::new(MockSpeechToText::returning("from the microphone")))
        .with_translator(Arc::new(EchoTranslate));

    let Submission::Run(run) = pipeline
        .submit(RunInput::Audio(vec![0u8; 128]))
        .await
        .unwrap()
    else {
        panic!("expected a run");
    };

    assert_eq!(run.document.unwrap().spoken_text, "from the microphone");
}
