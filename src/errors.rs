/*!
 * Error types for the signwave application.
 *
 * This module contains custom error types for each pipeline stage,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur during speech-to-text transcription
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// Error when sending the transcription request fails
    #[error("Transcription request failed: {0}")]
    Request(String),

    /// Error returned by the transcription API itself
    #[error("Transcription API responded with error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error staging the audio payload to the transient buffer
    #[error("Failed to stage audio payload: {0}")]
    Io(#[from] std::io::Error),

    /// Error when parsing the transcription response fails
    #[error("Failed to parse transcription response: {0}")]
    Parse(String),
}

/// Errors that can occur during gloss translation
#[derive(Error, Debug)]
pub enum ReasoningError {
    /// Error when sending the completion request fails
    #[error("Reasoning request failed: {0}")]
    Request(String),

    /// Error returned by the completion API itself
    #[error("Reasoning API responded with error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The completion succeeded but carried no content
    #[error("Reasoning endpoint returned an empty response")]
    EmptyResponse,

    /// The returned payload did not conform to the gloss document schema
    #[error("Failed to parse gloss document: {0}")]
    Parse(String),
}

/// Errors that can occur during video rendering
#[derive(Error, Debug)]
pub enum RenderError {
    /// Error when sending a render or poll request fails
    #[error("Render request failed: {0}")]
    Request(String),

    /// Error returned by the rendering API itself
    #[error("Render API responded with error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The job completed but its result payload held no video locator
    #[error("Render job completed with no video in the result payload")]
    EmptyResult,

    /// The job did not complete within the configured poll budget
    #[error("Render job did not complete after {attempts} polls")]
    Timeout {
        /// Number of status polls performed before giving up
        attempts: u32,
    },

    /// The remote service reported the job as failed
    #[error("Render job failed: {0}")]
    JobFailed(String),
}

/// Pipeline stages, used to attribute failures to their origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transcription,
    Reasoning,
    Rendering,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transcription => write!(f, "transcription"),
            Self::Reasoning => write!(f, "reasoning"),
            Self::Rendering => write!(f, "rendering"),
        }
    }
}

/// A stage failure: the originating stage plus the underlying cause
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Failure during the transcription stage
    #[error("transcription stage failed: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Failure during the reasoning stage
    #[error("reasoning stage failed: {0}")]
    Reasoning(#[from] ReasoningError),

    /// Failure during the rendering stage
    #[error("rendering stage failed: {0}")]
    Rendering(#[from] RenderError),

    /// An operation was requested in a state that does not permit it
    #[error("invalid pipeline transition: {0}")]
    InvalidTransition(String),
}

impl PipelineError {
    /// The stage this failure originated from, when it maps to one
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Transcription(_) => Some(Stage::Transcription),
            Self::Reasoning(_) => Some(Stage::Reasoning),
            Self::Rendering(_) => Some(Stage::Rendering),
            Self::InvalidTransition(_) => None,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration loading or validation
    #[error("Config error: {0}")]
    Config(String),

    /// Error from a pipeline run
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
