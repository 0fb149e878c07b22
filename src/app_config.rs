use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Speech-to-text settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Gloss translation settings
    #[serde(default)]
    pub reasoning: ReasoningConfig,

    /// Video rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Video render backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderProvider {
    /// Google Veo, asynchronous operation polling
    #[default]
    Veo,
    /// Runway, asynchronous task polling
    Runway,
    /// fal.ai, single synchronous call
    Fal,
}

impl RenderProvider {
    /// Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Veo => "Veo",
            Self::Runway => "Runway",
            Self::Fal => "fal.ai",
        }
    }

    /// Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Veo => "veo".to_string(),
            Self::Runway => "runway".to_string(),
            Self::Fal => "fal".to_string(),
        }
    }
}

impl std::fmt::Display for RenderProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for RenderProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "veo" => Ok(Self::Veo),
            "runway" => Ok(Self::Runway),
            "fal" => Ok(Self::Fal),
            _ => Err(anyhow!("Invalid render provider: {}", s)),
        }
    }
}

/// Speech-to-text service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Model name used for transcription
    #[serde(default = "default_transcription_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_groq_endpoint")]
    pub endpoint: String,

    /// Directory for the transient audio staging file.
    /// Falls back to the system temporary directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: default_transcription_model(),
            endpoint: default_groq_endpoint(),
            staging_dir: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Gloss translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReasoningConfig {
    /// Model name used for gloss translation
    #[serde(default = "default_reasoning_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_groq_endpoint")]
    pub endpoint: String,

    /// Temperature parameter for generation.
    /// Pinned low so repeated runs produce stable gloss sequences.
    #[serde(default = "default_reasoning_temperature")]
    pub temperature: f32,

    /// Maximum tokens the completion may produce
    #[serde(default = "default_reasoning_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            model: default_reasoning_model(),
            endpoint: default_groq_endpoint(),
            temperature: default_reasoning_temperature(),
            max_tokens: default_reasoning_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Video rendering configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Render backend to use
    #[serde(default)]
    pub provider: RenderProvider,

    /// Per-backend settings
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Seconds to sleep between job status polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Maximum number of status polls before a job is abandoned
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Aspect ratio requested from the backend
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// Request timeout in seconds for render calls
    #[serde(default = "default_render_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            provider: RenderProvider::default(),
            backends: BackendsConfig::default(),
            poll_interval_secs: default_poll_interval_secs(),
            max_poll_attempts: default_max_poll_attempts(),
            aspect_ratio: default_aspect_ratio(),
            timeout_secs: default_render_timeout_secs(),
        }
    }
}

/// Per-backend model and endpoint settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendsConfig {
    /// Veo model identifier
    #[serde(default = "default_veo_model")]
    pub veo_model: String,

    /// Veo endpoint URL
    #[serde(default = "default_veo_endpoint")]
    pub veo_endpoint: String,

    /// Runway model identifier
    #[serde(default = "default_runway_model")]
    pub runway_model: String,

    /// Runway endpoint URL
    #[serde(default = "default_runway_endpoint")]
    pub runway_endpoint: String,

    /// fal.ai model path
    #[serde(default = "default_fal_model")]
    pub fal_model: String,

    /// fal.ai endpoint URL
    #[serde(default = "default_fal_endpoint")]
    pub fal_endpoint: String,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            veo_model: default_veo_model(),
            veo_endpoint: default_veo_endpoint(),
            runway_model: default_runway_model(),
            runway_endpoint: default_runway_endpoint(),
            fal_model: default_fal_model(),
            fal_endpoint: default_fal_endpoint(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_render_timeout_secs() -> u64 {
    60
}

fn default_reasoning_temperature() -> f32 {
    0.1
}

fn default_reasoning_max_tokens() -> u32 {
    1024
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_max_poll_attempts() -> u32 {
    // 60 polls at the default 5s interval gives the job five minutes
    60
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_groq_endpoint() -> String {
    "https://api.groq.com".to_string()
}

fn default_transcription_model() -> String {
    "whisper-large-v3-turbo".to_string()
}

fn default_reasoning_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_veo_model() -> String {
    "veo-3.1-fast-generate-preview".to_string()
}

fn default_veo_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_runway_model() -> String {
    "gen3a_turbo".to_string()
}

fn default_runway_endpoint() -> String {
    "https://api.dev.runwayml.com".to_string()
}

fn default_fal_model() -> String {
    "fal-ai/ltx-video".to_string()
}

fn default_fal_endpoint() -> String {
    "https://fal.run".to_string()
}

impl Config {
    /// Load configuration from a JSON file, creating a default file when
    /// none exists at the given path.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read config {}: {}", path.display(), e))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow!("Failed to parse config {}: {}", path.display(), e))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            let content = serde_json::to_string_pretty(&config)?;
            std::fs::write(path, content)
                .map_err(|e| anyhow!("Failed to write config {}: {}", path.display(), e))?;
            Ok(config)
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.reasoning.model.is_empty() {
            return Err(anyhow!("Reasoning model must not be empty"));
        }
        if self.transcription.model.is_empty() {
            return Err(anyhow!("Transcription model must not be empty"));
        }
        if self.render.poll_interval_secs == 0 {
            return Err(anyhow!("Poll interval must be at least one second"));
        }
        if self.render.max_poll_attempts == 0 {
            return Err(anyhow!("Max poll attempts must be at least one"));
        }

        let endpoints = [
            ("transcription", &self.transcription.endpoint),
            ("reasoning", &self.reasoning.endpoint),
            ("veo", &self.render.backends.veo_endpoint),
            ("runway", &self.render.backends.runway_endpoint),
            ("fal", &self.render.backends.fal_endpoint),
        ];
        for (name, endpoint) in endpoints {
            Url::parse(endpoint)
                .map_err(|e| anyhow!("Invalid {} endpoint '{}': {}", name, endpoint, e))?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            transcription: TranscriptionConfig::default(),
            reasoning: ReasoningConfig::default(),
            render: RenderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
