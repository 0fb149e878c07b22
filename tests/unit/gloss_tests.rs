/*!
 * Tests for the gloss document schema and parsing contract
 */

use signwave::errors::ReasoningError;
use signwave::gloss::{parse_gloss_document, Expression, GLOSS_SCHEMA_VERSION};

use crate::common::{book_open_document, BOOK_OPEN_JSON};

#[test]
fn test_parse_requiredFieldsOnly_shouldDefaultVersion() {
    let doc = parse_gloss_document(BOOK_OPEN_JSON).unwrap();
    assert_eq!(doc.schema_version, GLOSS_SCHEMA_VERSION);
    assert!(doc.isl_sequence.is_none());
}

#[test]
fn test_parse_explicitVersion_shouldBePreserved() {
    let doc = parse_gloss_document(
        r#"{
            "schema_version": 2,
            "spoken_text": "Hello",
            "isl_gloss": "HELLO",
            "rendering_prompt": "a person signing hello"
        }"#,
    )
    .unwrap();
    assert_eq!(doc.schema_version, 2);
}

#[test]
fn test_parse_sequenceMetadata_shouldBeOptionalExtension() {
    let doc = parse_gloss_document(
        r#"{
            "spoken_text": "Thank you",
            "isl_gloss": "THANK-YOU",
            "isl_sequence": [
                { "sign_id": "THANK-YOU", "duration_ms": 900, "expression": "POLITE", "intensity": 0.6 }
            ],
            "rendering_prompt": "a person signing thank you politely"
        }"#,
    )
    .unwrap();

    let sequence = doc.isl_sequence.unwrap();
    assert_eq!(sequence[0].expression, Expression::Polite);
    assert_eq!(sequence[0].duration_ms, 900);
    assert_eq!(sequence[0].intensity, Some(0.6));
}

#[test]
fn test_parse_unknownExpression_shouldFail() {
    let result = parse_gloss_document(
        r#"{
            "spoken_text": "Hello",
            "isl_gloss": "HELLO",
            "isl_sequence": [
                { "sign_id": "HELLO", "duration_ms": 500, "expression": "WINK" }
            ],
            "rendering_prompt": "x"
        }"#,
    );
    assert!(matches!(result, Err(ReasoningError::Parse(_))));
}

// Translation never yields a partially-populated document: any missing
// required field fails the parse as a whole.
#[test]
fn test_parse_eachMissingRequiredField_shouldFail() {
    let complete = serde_json::json!({
        "spoken_text": "Hello",
        "isl_gloss": "HELLO",
        "rendering_prompt": "a person signing hello"
    });

    for field in ["spoken_text", "isl_gloss", "rendering_prompt"] {
        let mut partial = complete.clone();
        partial.as_object_mut().unwrap().remove(field);
        let result = parse_gloss_document(&partial.to_string());
        assert!(
            matches!(result, Err(ReasoningError::Parse(_))),
            "expected parse failure without {}",
            field
        );
    }
}

#[test]
fn test_summary_shouldMatchFlatGlossExactly() {
    assert_eq!(book_open_document().summary(), "BOOK OPEN");
}

#[test]
fn test_document_serialization_shouldRoundTrip() {
    let doc = book_open_document();
    let json = serde_json::to_string(&doc).unwrap();
    let back = parse_gloss_document(&json).unwrap();
    assert_eq!(doc, back);
}
