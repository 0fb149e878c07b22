use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::RenderError;
use crate::providers::{VideoBackend, VideoLocator};

/// fal.ai client, synchronous video generation.
/// One blocking call returns the locator directly or fails immediately,
/// so this backend implements [`VideoBackend`] without a poll loop.
#[derive(Debug)]
pub struct Fal {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Model path, e.g. "fal-ai/ltx-video"
    model: String,
    /// Requested aspect ratio
    aspect_ratio: String,
}

/// fal generation request
#[derive(Debug, Serialize)]
struct FalRequest {
    prompt: String,
    aspect_ratio: String,
    num_videos: u32,
}

/// fal generation response
#[derive(Debug, Deserialize)]
struct FalResponse {
    video: Option<FalVideo>,
}

#[derive(Debug, Deserialize)]
struct FalVideo {
    url: Option<String>,
}

impl Fal {
    /// Create a new fal client
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

    fn api_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            "https://fal.run"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/{}", base, self.model)
    }
}

#[async_trait]
impl VideoBackend for Fal {
    fn name(&self) -> &str {
        "fal"
    }

    async fn render(&self, prompt: &str) -> Result<VideoLocator, RenderError> {
        let request = FalRequest {
            prompt: prompt.to_string(),
            aspect_ratio: self.aspect_ratio.clone(),
            num_videos: 1,
        };

        let response = self
            .client
            .post(self.api_url())
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("fal render error ({}): {}", status, error_text);
            return Err(RenderError::Api {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let parsed = response
            .json::<FalResponse>()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        parsed
            .video
            .and_then(|v| v.url)
            .map(VideoLocator::new)
            .ok_or(RenderError::EmptyResult)
    }
}
