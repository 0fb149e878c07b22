/*!
 * Common test utilities for the signwave test suite
 */

use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use signwave::gloss::parse_gloss_document;
use signwave::pipeline::Pipeline;
use signwave::providers::mock::{MockGlossTranslate, MockSpeechToText, MockVideoBackend};

/// The gloss payload most tests run against
pub const BOOK_OPEN_JSON: &str = r#"{
    "spoken_text": "Open the book",
    "isl_gloss": "BOOK OPEN",
    "rendering_prompt": "a person signing open book"
}"#;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// A pipeline with working mock adapters on every seam
pub fn working_pipeline() -> Pipeline {
    Pipeline::new()
        .with_transcriber(Arc::new(MockSpeechToText::returning("Open the book")))
        .with_translator(Arc::new(MockGlossTranslate::from_json(BOOK_OPEN_JSON)))
        .with_renderer(Arc::new(MockVideoBackend::returning(
            "https://video.example/v.mp4",
        )))
}

/// A pipeline with only the reasoning seam attached
pub fn reasoning_only_pipeline() -> Pipeline {
    Pipeline::new().with_translator(Arc::new(MockGlossTranslate::from_json(BOOK_OPEN_JSON)))
}

/// Parse the shared payload into a document
pub fn book_open_document() -> signwave::GlossDocument {
    parse_gloss_document(BOOK_OPEN_JSON).unwrap()
}
