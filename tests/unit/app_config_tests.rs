/*!
 * Tests for configuration loading and validation
 */

use std::str::FromStr;

use signwave::app_config::{Config, RenderProvider};

use crate::common::create_temp_dir;

#[test]
fn test_loadOrCreate_missingFile_shouldWriteDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.render.poll_interval_secs, 5);
    assert_eq!(config.reasoning.model, "llama-3.3-70b-versatile");
    assert_eq!(config.transcription.model, "whisper-large-v3-turbo");
}

#[test]
fn test_loadOrCreate_existingFile_shouldRoundTrip() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let written = Config::load_or_create(&path).unwrap();
    let reloaded = Config::load_or_create(&path).unwrap();

    assert_eq!(written.render.provider, reloaded.render.provider);
    assert_eq!(written.reasoning.model, reloaded.reasoning.model);
}

#[test]
fn test_loadOrCreate_partialFile_shouldFillDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{ "render": { "provider": "runway", "poll_interval_secs": 2 } }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.render.provider, RenderProvider::Runway);
    assert_eq!(config.render.poll_interval_secs, 2);
    assert_eq!(config.render.max_poll_attempts, 60);
    assert_eq!(config.render.aspect_ratio, "16:9");
}

#[test]
fn test_loadOrCreate_invalidJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "not json at all").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_loadOrCreate_invalidValues_shouldFailValidation() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, r#"{ "render": { "max_poll_attempts": 0 } }"#).unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_renderProvider_parse_shouldAcceptAllBackends() {
    assert_eq!(RenderProvider::from_str("veo").unwrap(), RenderProvider::Veo);
    assert_eq!(
        RenderProvider::from_str("RUNWAY").unwrap(),
        RenderProvider::Runway
    );
    assert_eq!(RenderProvider::from_str("fal").unwrap(), RenderProvider::Fal);
}

#[test]
fn test_renderProvider_displayName_shouldBeHumanReadable() {
    assert_eq!(RenderProvider::Veo.display_name(), "Veo");
    assert_eq!(RenderProvider::Fal.display_name(), "fal.ai");
}
