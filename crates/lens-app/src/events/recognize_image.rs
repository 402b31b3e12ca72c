use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kanal::AsyncSender;
use lens_ollama::Recognizer;
use lens_types::Language;

use crate::events::AppEvent;
use crate::state::AppState;

pub async fn handle_recognize_image(
    state: Arc<AppState>,
    image: &Path,
    language: Language,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<String> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), image.display());

    let text = recognize_bytes(&state, &bytes, language).await?;
    app_to_ui_tx.send(AppEvent::Recognized(text.clone())).await?;

    Ok(text)
}

/// Encode raw image bytes and run them through the configured recognizer
pub async fn recognize_bytes(
    state: &AppState,
    bytes: &[u8],
    language: Language,
) -> anyhow::Result<String> {
    let service = state.config.read().await.service.clone();
    let encoded = STANDARD.encode(bytes);

    let text = state
        .recognizer
        .recognize(&encoded, language, &service)
        .await
        .with_context(|| format!("Recognition with {} failed", service.model))?;

    Ok(text)
}
