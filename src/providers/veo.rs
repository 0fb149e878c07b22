use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::RenderError;
use crate::providers::{JobClient, JobHandle, JobStatus, VideoLocator};

/// Google Veo client, job-style video generation over long-running operations
#[derive(Debug)]
pub struct Veo {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Model identifier
    model: String,
    /// Requested aspect ratio
    aspect_ratio: String,
}

/// Veo generation request
#[derive(Debug, Serialize)]
struct VeoRequest {
    instances: Vec<VeoInstance>,
    parameters: VeoParameters,
}

#[derive(Debug, Serialize)]
struct VeoInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
struct VeoParameters {
    #[serde(rename = "aspectRatio")]
    aspect_ratio: String,
    #[serde(rename = "sampleCount")]
    sample_count: u32,
}

/// Long-running operation envelope returned by submit and status calls
#[derive(Debug, Deserialize)]
struct VeoOperation {
    /// Operation resource name, used for status fetches
    name: Option<String>,
    /// Whether the operation has finished
    #[serde(default)]
    done: bool,
    /// Result payload, present once the operation completes successfully
    response: Option<VeoResponse>,
    /// Error payload, present when the operation failed
    error: Option<VeoError>,
}

#[derive(Debug, Deserialize)]
struct VeoResponse {
    #[serde(rename = "generateVideoResponse")]
    generate_video_response: Option<VeoVideoResponse>,
}

#[derive(Debug, Deserialize)]
struct VeoVideoResponse {
    #[serde(rename = "generatedSamples", default)]
    generated_samples: Vec<VeoSample>,
}

#[derive(Debug, Deserialize)]
struct VeoSample {
    video: Option<VeoVideo>,
}

#[derive(Debug, Deserialize)]
struct VeoVideo {
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VeoError {
    message: Option<String>,
}

impl Veo {
    /// Create a new Veo client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        aspect_ratio: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            aspect_ratio: aspect_ratio.into(),
        }
    }

    fn base_url(&self) -> &str {
        if self.endpoint.is_empty() {
            "https://generativelanguage.googleapis.com"
        } else {
            self.endpoint.trim_end_matches('/')
        }
    }

    async fn check_status(
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, RenderError> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Veo {} error ({}): {}", context, status, error_text);
            return Err(RenderError::Api {
                status_code: status.as_u16(),
                message: error_text,
            });
        }
        Ok(response)
    }

    fn status_from_operation(operation: VeoOperation) -> JobStatus {
        if !operation.done {
            return JobStatus::Running;
        }
        if let Some(err) = operation.error {
            return JobStatus::Failed(
                err.message.unwrap_or_else(|| "unspecified operation error".to_string()),
            );
        }
        let locator = operation
            .response
            .and_then(|r| r.generate_video_response)
            .and_then(|v| v.generated_samples.into_iter().next())
            .and_then(|s| s.video)
            .and_then(|v| v.uri)
            .map(VideoLocator::new);
        JobStatus::Done(locator)
    }
}

#[async_trait]
impl JobClient for Veo {
    fn name(&self) -> &str {
        "veo"
    }

    async fn submit(&self, prompt: &str) -> Result<JobHandle, RenderError> {
        let url = format!(
            "{}/v1beta/models/{}:predictLongRunning",
            self.base_url(),
            self.model
        );
        let request = VeoRequest {
            instances: vec![VeoInstance {
                prompt: prompt.to_string(),
            }],
            parameters: VeoParameters {
                aspect_ratio: self.aspect_ratio.clone(),
                sample_count: 1,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        let response = Self::check_status(response, "submit").await?;
        let operation = response
            .json::<VeoOperation>()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        match operation.name {
            Some(name) => Ok(JobHandle::new(name)),
            None => Err(RenderError::Request(
                "submit response carried no operation name".to_string(),
            )),
        }
    }

    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, RenderError> {
        let url = format!("{}/v1beta/{}", self.base_url(), handle.id());

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        let response = Self::check_status(response, "status").await?;
        let operation = response
            .json::<VeoOperation>()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        Ok(Self::status_from_operation(operation))
    }
}
