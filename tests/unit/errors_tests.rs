/*!
 * Tests for the error taxonomy
 */

use signwave::errors::{PipelineError, ReasoningError, RenderError, Stage, TranscriptionError};

#[test]
fn test_transcriptionError_api_shouldFormatStatusAndMessage() {
    let error = TranscriptionError::Api {
        status_code: 401,
        message: "invalid key".to_string(),
    };
    let text = error.to_string();
    assert!(text.contains("401"));
    assert!(text.contains("invalid key"));
}

#[test]
fn test_reasoningError_emptyResponse_shouldHaveDistinctMessage() {
    let error = ReasoningError::EmptyResponse;
    assert!(error.to_string().contains("empty response"));
}

#[test]
fn test_renderError_timeout_shouldReportAttemptCount() {
    let error = RenderError::Timeout { attempts: 60 };
    assert!(error.to_string().contains("60"));
}

#[test]
fn test_renderError_emptyResult_isDistinctFromTimeout() {
    let empty = RenderError::EmptyResult.to_string();
    let timeout = RenderError::Timeout { attempts: 1 }.to_string();
    assert_ne!(empty, timeout);
    assert!(empty.contains("no video"));
}

#[test]
fn test_pipelineError_shouldAttributeStage() {
    let transcription: PipelineError = TranscriptionError::Request("boom".to_string()).into();
    let reasoning: PipelineError = ReasoningError::EmptyResponse.into();
    let rendering: PipelineError = RenderError::EmptyResult.into();

    assert_eq!(transcription.stage(), Some(Stage::Transcription));
    assert_eq!(reasoning.stage(), Some(Stage::Reasoning));
    assert_eq!(rendering.stage(), Some(Stage::Rendering));
}

#[test]
fn test_pipelineError_invalidTransition_shouldHaveNoStage() {
    let error = PipelineError::InvalidTransition("render in idle".to_string());
    assert_eq!(error.stage(), None);
}

#[test]
fn test_stage_display_shouldBeLowercase() {
    assert_eq!(Stage::Transcription.to_string(), "transcription");
    assert_eq!(Stage::Reasoning.to_string(), "reasoning");
    assert_eq!(Stage::Rendering.to_string(), "rendering");
}

#[test]
fn test_transcriptionError_fromIo_shouldWrapCause() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: TranscriptionError = io.into();
    assert!(matches!(error, TranscriptionError::Io(_)));
    assert!(error.to_string().contains("gone"));
}
