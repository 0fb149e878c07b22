use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::RenderError;
use crate::providers::{JobClient, JobHandle, JobStatus, VideoLocator};

/// API version header the task endpoints require
const RUNWAY_VERSION: &str = "2024-11-06";

/// Runway client, job-style video generation over the tasks API
#[derive(Debug)]
pub struct Runway {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Model identifier
    model: String,
    /// Requested aspect ratio
    ratio: String,
}

/// Runway generation request
#[derive(Debug, Serialize)]
struct RunwayRequest {
    model: String,
    #[serde(rename = "promptText")]
    prompt_text: String,
    ratio: String,
    /// Clip length in seconds
    duration: u32,
}

/// Task creation response
#[derive(Debug, Deserialize)]
struct RunwayTaskCreated {
    id: String,
}

/// Task status response
#[derive(Debug, Deserialize)]
struct RunwayTask {
    /// One of PENDING, RUNNING, THROTTLED, SUCCEEDED, FAILED
    status: String,
    /// Output URLs, present on success
    #[serde(default)]
    output: Vec<String>,
    /// Failure description, present on failure
    failure: Option<String>,
}

impl Runway {
    /// Create a new Runway client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        ratio: impl Into<String>,
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
            ratio: ratio.into(),
        }
    }

    fn base_url(&self) -> &str {
        if self.endpoint.is_empty() {
            "https://api.dev.runwayml.com"
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
            error!("Runway {} error ({}): {}", context, status, error_text);
            return Err(RenderError::Api {
                status_code: status.as_u16(),
                message: error_text,
            });
        }
        Ok(response)
    }

    fn status_from_task(task: RunwayTask) -> JobStatus {
        match task.status.as_str() {
            "SUCCEEDED" => JobStatus::Done(task.output.into_iter().next().map(VideoLocator::new)),
            "FAILED" => JobStatus::Failed(
                task.failure.unwrap_or_else(|| "unspecified task failure".to_string()),
            ),
            // PENDING, RUNNING, THROTTLED all mean the job is still in flight
            _ => JobStatus::Running,
        }
    }
}

#[async_trait]
impl JobClient for Runway {
    fn name(&self) -> &str {
        "runway"
    }

    async fn submit(&self, prompt: &str) -> Result<JobHandle, RenderError> {
        let url = format!("{}/v1/text_to_video", self.base_url());
        let request = RunwayRequest {
            model: self.model.clone(),
            prompt_text: prompt.to_string(),
            ratio: self.ratio.clone(),
            duration: 5,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("X-Runway-Version", RUNWAY_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        let response = Self::check_status(response, "submit").await?;
        let created = response
            .json::<RunwayTaskCreated>()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        Ok(JobHandle::new(created.id))
    }

    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, RenderError> {
        let url = format!("{}/v1/tasks/{}", self.base_url(), handle.id());

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("X-Runway-Version", RUNWAY_VERSION)
            .send()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        let response = Self::check_status(response, "status").await?;
        let task = response
            .json::<RunwayTask>()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        Ok(Self::status_from_task(task))
    }
}
