/*!
 * Gloss translation: plain English text to a structured ISL gloss document.
 *
 * The semantic transformation itself is delegated to the remote model; this
 * module owns the contract — request shaping, the fixed system instruction,
 * schema parsing, and error discrimination.
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app_config::ReasoningConfig;
use crate::errors::ReasoningError;
use crate::providers::groq::{ChatRequest, Groq};

/// Current gloss document schema version
pub const GLOSS_SCHEMA_VERSION: u32 = 1;

/// The JSON shape the model is instructed to produce
static GLOSS_SCHEMA: Lazy<serde_json::Value> = Lazy::new(|| {
    serde_json::json!({
        "schema_version": 1,
        "spoken_text": "string",
        "isl_gloss": "string, the gloss line in sign order",
        "isl_sequence": [
            {
                "sign_id": "string",
                "duration_ms": "number",
                "expression": "SMILE | NEUTRAL | POLITE | FROWN",
                "intensity": "number between 0 and 1, optional"
            }
        ],
        "rendering_prompt": "string, a visual description suitable for video generation"
    })
});

/// Fixed system instruction sent with every translation request
pub static SYSTEM_INSTRUCTION: Lazy<String> = Lazy::new(|| {
    format!(
        "You are an Indian Sign Language (ISL) translation engine.\n\
         Task: translate spoken English into ISL gloss and a sign sequence.\n\
         Output MUST be a single valid JSON object with no markdown or extra text.\n\
         The isl_sequence field may be omitted when sign timing is unknown.\n\
         Mandatory schema:\n{}",
        serde_json::to_string_pretty(&*GLOSS_SCHEMA).unwrap_or_default()
    )
});

/// Facial expression accompanying a sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Expression {
    Smile,
    Neutral,
    Polite,
    Frown,
}

/// One sign in the production sequence.
/// Playback metadata is an optional extension of the schema; consumers must
/// not require it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignToken {
    /// Identifier of the sign in the ISL lexicon
    pub sign_id: String,

    /// Playback duration for this sign
    pub duration_ms: u64,

    /// Facial expression while signing
    pub expression: Expression,

    /// Expression intensity between 0 and 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
}

/// Structured translation output.
/// Either every required field parsed, or the whole document is absent —
/// no partially-populated document is ever produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossDocument {
    /// Schema version the document conforms to
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// The recognized or typed English text
    pub spoken_text: String,

    /// Flat gloss line in sign order
    pub isl_gloss: String,

    /// Per-sign playback metadata, optional extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isl_sequence: Option<Vec<SignToken>>,

    /// Visual description handed to the video renderer
    pub rendering_prompt: String,
}

fn default_schema_version() -> u32 {
    GLOSS_SCHEMA_VERSION
}

impl GlossDocument {
    /// The gloss summary line shown on the surface: the flat gloss when
    /// present, otherwise the sign identifiers joined in sequence order.
    pub fn summary(&self) -> String {
        let gloss = self.isl_gloss.trim();
        if !gloss.is_empty() {
            return gloss.to_string();
        }
        self.isl_sequence
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|t| t.sign_id.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// Parse a raw model payload into a gloss document
pub fn parse_gloss_document(content: &str) -> Result<GlossDocument, ReasoningError> {
    serde_json::from_str::<GlossDocument>(content).map_err(|e| ReasoningError::Parse(e.to_string()))
}

/// Common trait for gloss translation implementations
#[async_trait]
pub trait GlossTranslate: Send + Sync {
    /// Translate English text into a gloss document
    async fn translate(&self, text: &str) -> Result<GlossDocument, ReasoningError>;
}

/// Gloss translator backed by the Groq chat-completion endpoint
pub struct GroqGlossTranslator {
    client: Groq,
    config: ReasoningConfig,
}

impl GroqGlossTranslator {
    /// Create a translator with an explicitly supplied API key
    pub fn new(api_key: impl Into<String>, config: ReasoningConfig) -> Self {
        let client = Groq::new(api_key, config.endpoint.clone(), config.timeout_secs);
        Self { client, config }
    }
}

#[async_trait]
impl GlossTranslate for GroqGlossTranslator {
    async fn translate(&self, text: &str) -> Result<GlossDocument, ReasoningError> {
        let request = ChatRequest::new(self.config.model.clone(), self.config.max_tokens)
            .add_message("system", SYSTEM_INSTRUCTION.as_str())
            .add_message("user", text)
            .temperature(self.config.temperature)
            .json_output();

        let response = self.client.complete(request).await?;
        let content = Groq::extract_text_from_response(&response);
        if content.trim().is_empty() {
            return Err(ReasoningError::EmptyResponse);
        }

        parse_gloss_document(&content)
    }
}
