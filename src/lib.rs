/*!
 * # signwave
 *
 * A Rust library and CLI for producing Indian Sign Language (ISL) output
 * from English speech or text using hosted AI services.
 *
 * ## Features
 *
 * - Transcribe recorded audio through the Groq speech-to-text endpoint
 * - Translate English text into a structured ISL gloss document using a
 *   fixed-instruction chat completion with a JSON output contract
 * - Render a video of the signed sequence through one of three
 *   interchangeable backends (Google Veo, Runway, fal.ai)
 * - Strictly sequential pipeline with per-stage failure attribution
 * - Bounded polling for the asynchronous render backends
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `credentials`: API key resolution (environment, interactive prompt)
 * - `transcribe`: Speech-to-text adapter and audio staging
 * - `gloss`: Gloss translation and the canonical document schema
 * - `render`: Render backend selection and the bounded poll loop
 * - `pipeline`: The run state machine and stage sequencing
 * - `app_controller`: Interactive surface and run history
 * - `providers`: Client implementations for the remote services:
 *   - `providers::groq`: Groq chat-completion and transcription client
 *   - `providers::veo`: Google Veo operations client
 *   - `providers::runway`: Runway tasks client
 *   - `providers::fal`: fal.ai synchronous client
 *   - `providers::mock`: scripted mocks for every seam
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod credentials;
pub mod errors;
pub mod gloss;
pub mod pipeline;
pub mod providers;
pub mod render;
pub mod transcribe;

// Re-export main types for easier usage
pub use app_config::{Config, RenderProvider};
pub use app_controller::Controller;
pub use credentials::{CredentialStore, Service};
pub use errors::{AppError, PipelineError, ReasoningError, RenderError, TranscriptionError};
pub use gloss::{GlossDocument, GlossTranslate, SignToken};
pub use pipeline::{Pipeline, PipelineRun, PipelineState, RunInput};
pub use providers::{VideoBackend, VideoLocator};
pub use transcribe::SpeechToText;
