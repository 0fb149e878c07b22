use std::path::Path;
use std::time::Duration;

use log::error;
use reqwest::multipart;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::{ReasoningError, TranscriptionError};

/// Groq client for the chat-completion and audio-transcription endpoints
#[derive(Debug)]
pub struct Groq {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
}

/// Groq chat-completion request (OpenAI wire format)
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    max_tokens: u32,

    /// Output format constraint, e.g. json_object
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Response format constraint accepted by the endpoint
#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    /// Format type, currently only "json_object" is used
    #[serde(rename = "type")]
    pub format_type: String,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u32,
    /// Number of completion tokens
    pub completion_tokens: u32,
}

/// Groq chat-completion response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// The completion choices, first one carries the content
    pub choices: Vec<ChatChoice>,
    /// Token usage information
    pub usage: Option<TokenUsage>,
}

/// Individual choice in a chat response
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatMessage,
}

/// Groq transcription response
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    /// The recognized text
    text: String,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens,
            response_format: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Constrain the output to syntactically valid JSON
    pub fn json_output(mut self) -> Self {
        self.response_format = Some(ResponseFormat {
            format_type: "json_object".to_string(),
        });
        self
    }
}

impl Groq {
    /// Create a new Groq client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api.groq.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/openai/v1/{}", base, path)
    }

    /// Complete a chat request
    pub async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ReasoningError> {
        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ReasoningError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Groq chat API error ({}): {}", status, error_text);
            return Err(ReasoningError::Api {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ReasoningError::Parse(e.to_string()))
    }

    /// Transcribe an audio file already staged on disk.
    /// The endpoint requires a named multipart file part, which is why the
    /// caller stages raw bytes into a file first.
    pub async fn transcribe_file(
        &self,
        path: &Path,
        model: &str,
    ) -> Result<String, TranscriptionError> {
        let audio = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());

        let part = multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::Request(e.to_string()))?;

        let form = multipart::Form::new()
            .text("model", model.to_string())
            .text("response_format", "json")
            .text("temperature", "0")
            .part("file", part);

        let response = self
            .client
            .post(self.api_url("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Groq transcription API error ({}): {}", status, error_text);
            return Err(TranscriptionError::Api {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let parsed = response
            .json::<TranscriptionResponse>()
            .await
            .map_err(|e| TranscriptionError::Parse(e.to_string()))?;

        Ok(parsed.text)
    }

    /// Extract text content from a chat response
    pub fn extract_text_from_response(response: &ChatResponse) -> String {
        response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default()
    }
}
