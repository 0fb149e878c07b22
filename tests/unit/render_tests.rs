/*!
 * Tests for render backend selection and the bounded poll loop
 */

use std::sync::Arc;
use std::time::Duration;

use signwave::app_config::{RenderConfig, RenderProvider};
use signwave::credentials::{CredentialStore, Service};
use signwave::errors::RenderError;
use signwave::providers::mock::MockJobClient;
use signwave::providers::{JobStatus, VideoBackend, VideoLocator};
use signwave::render::{build_backend, frame_prompt, PollingBackend};

fn fast_backend(client: MockJobClient, max_attempts: u32) -> PollingBackend<MockJobClient> {
    PollingBackend::new(client, Duration::from_millis(1), max_attempts)
}

#[tokio::test]
async fn test_pollLoop_shouldStopAtFirstDoneResponse() {
    let client = MockJobClient::from_script(vec![
        JobStatus::Running,
        JobStatus::Running,
        JobStatus::Done(Some(VideoLocator::new("https://video.example/final.mp4"))),
        // A further status would be Done too, but must never be requested
        JobStatus::Done(Some(VideoLocator::new("https://video.example/other.mp4"))),
    ]);
    let polls = client.poll_counter();
    let backend = fast_backend(client, 60);

    let locator = backend.render("prompt").await.unwrap();

    assert_eq!(locator.url, "https://video.example/final.mp4");
    assert_eq!(polls.load(std::sync::atomic::Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_pollLoop_completedWithoutPayload_shouldBeEmptyResultNotDone() {
    let client = MockJobClient::from_script(vec![JobStatus::Running, JobStatus::Done(None)]);
    let backend = fast_backend(client, 60);

    let result = backend.render("prompt").await;

    assert!(matches!(result, Err(RenderError::EmptyResult)));
}

#[tokio::test]
async fn test_pollLoop_budgetExhausted_shouldTimeOut() {
    let client = MockJobClient::always_running();
    let backend = fast_backend(client, 3);

    let result = backend.render("prompt").await;

    assert!(matches!(result, Err(RenderError::Timeout { attempts: 3 })));
}

#[tokio::test]
async fn test_pollLoop_statusTransportFailure_shouldAbort() {
    let client = MockJobClient::failing_status();
    let polls = client.poll_counter();
    let backend = fast_backend(client, 10);

    let result = backend.render("prompt").await;

    assert!(matches!(result, Err(RenderError::Request(_))));
    // The loop stops at the first transport failure instead of retrying
    assert_eq!(polls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_pollLoop_submitFailure_shouldNotEnterLoop() {
    let client = MockJobClient::failing_submit();
    let polls = client.poll_counter();
    let backend = fast_backend(client, 3);

    let result = backend.render("prompt").await;

    assert!(matches!(result, Err(RenderError::Api { .. })));
    assert_eq!(polls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn test_buildBackend_eachProvider_shouldRequireItsOwnCredential() {
    let cases = [
        (RenderProvider::Veo, Service::Veo),
        (RenderProvider::Runway, Service::Runway),
        (RenderProvider::Fal, Service::Fal),
    ];

    for (provider, service) in cases {
        let config = RenderConfig {
            provider,
            ..Default::default()
        };

        let missing = CredentialStore::from_pairs(&[]);
        assert!(build_backend(&config, &missing, None).is_none());

        let present = CredentialStore::from_pairs(&[(service, "key")]);
        let backend = build_backend(&config, &present, None).unwrap();
        assert_eq!(backend.name(), provider.to_lowercase_string());
    }
}

#[test]
fn test_buildBackend_wrongCredential_shouldReturnNone() {
    let config = RenderConfig {
        provider: RenderProvider::Veo,
        ..Default::default()
    };
    let credentials = CredentialStore::from_pairs(&[(Service::Runway, "rw-key")]);
    assert!(build_backend(&config, &credentials, None).is_none());
}

#[test]
fn test_framePrompt_shouldEmbedDocumentPrompt() {
    let framed = frame_prompt("a person signing open book");
    assert!(framed.contains("a person signing open book"));
    assert!(framed.starts_with("Cinematic"));
}

#[tokio::test]
async fn test_mockVideoBackend_isSharedAcrossTasks() {
    let backend: Arc<dyn VideoBackend> = Arc::new(
        signwave::providers::mock::MockVideoBackend::returning("https://video.example/v.mp4"),
    );
    let clone = Arc::clone(&backend);

    let handle = tokio::spawn(async move { clone.render("prompt").await });
    let first = backend.render("prompt").await.unwrap();
    let second = handle.await.unwrap().unwrap();

    assert_eq!(first, second);
}
