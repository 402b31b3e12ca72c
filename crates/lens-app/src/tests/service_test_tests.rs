//! Test-and-save, image recognition and config edits

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kanal::unbounded_async;
use lens_config::{Config, RecognitionMode};
use lens_types::Language;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::events::AppEvent;
use crate::events::recognize_image::handle_recognize_image;
use crate::events::test_service::{TEST_IMAGE_BASE64, handle_service_test};
use crate::events::update_config::{ConfigUpdate, handle_config_update};
use crate::profile::ProfileStore;
use crate::state::AppState;

fn state_for(host: &str, dir: &tempfile::TempDir) -> Arc<AppState> {
    let mut config = Config::default();
    config.service.request_path = host.to_string();
    Arc::new(AppState::new(config, ProfileStore::new(dir.path()), "main"))
}

#[tokio::test]
async fn passing_test_saves_profile_and_refreshes_services() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "test\n"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let state = state_for(&server.uri(), &dir);
    let (tx, rx) = unbounded_async();

    assert!(handle_service_test(state.clone(), &tx).await.unwrap());

    let saved = state.store.load("main").unwrap();
    assert_eq!(saved.service.request_path, server.uri());

    let mut events = vec![];
    while let Ok(Some(event)) = rx.try_recv() {
        events.push(event);
    }
    assert!(matches!(&events[0], AppEvent::Recognized(text) if text == "test"));
    assert!(matches!(&events[1], AppEvent::ConfigSaved { profile } if profile == "main"));
    assert!(matches!(&events[2], AppEvent::ServiceListChanged { instance } if instance == "Ollama OCR"));
}

#[tokio::test]
async fn failing_test_keeps_old_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let state = state_for(&server.uri(), &dir);
    let (tx, rx) = unbounded_async();

    assert!(!handle_service_test(state, &tx).await.unwrap());
    assert!(!dir.path().join("profiles").join("main.json").exists());

    match rx.try_recv() {
        Ok(Some(AppEvent::TestFailed(message))) => {
            assert_eq!(message, "test failed: No response from Ollama");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn recognizes_image_file_as_base64() {
    let image = b"\x89PNG\r\n\x1a\nfake image";
    let encoded = STANDARD.encode(image);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "images": [encoded]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"content": "  こんにちは  "}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("shot.png");
    std::fs::write(&file, image).unwrap();

    let state = state_for(&server.uri(), &dir);
    let (tx, _rx) = unbounded_async();

    let text = handle_recognize_image(state, &file, Language::Ja, &tx)
        .await
        .unwrap();
    assert_eq!(text, "こんにちは");
}

#[tokio::test]
async fn missing_image_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_for("http://127.0.0.1:9", &dir);
    let (tx, _rx) = unbounded_async();

    let err = handle_recognize_image(state, &dir.path().join("nope.png"), Language::Auto, &tx)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to read"));
}

#[tokio::test]
async fn mode_update_resets_prompt_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_for("localhost:11434", &dir);

    handle_config_update(state.clone(), ConfigUpdate::Prompt("custom".into()))
        .await
        .unwrap();
    handle_config_update(state.clone(), ConfigUpdate::Mode(RecognitionMode::Formula))
        .await
        .unwrap();

    let saved = state.store.load("main").unwrap();
    assert_eq!(saved.service.mode, RecognitionMode::Formula);
    assert_eq!(saved.service.prompt, "Formula Recognition:");
    assert_eq!(saved.service.host(), "https://localhost:11434");
}

#[test]
fn test_image_is_valid_png_base64() {
    let bytes = STANDARD.decode(TEST_IMAGE_BASE64).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
