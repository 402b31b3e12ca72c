use std::sync::Arc;

use anyhow::Context;
use kanal::AsyncSender;
use lens_ollama::{OllamaClient, OllamaError};
use lens_types::{ModelStatus, OLLAMA_DOWNLOAD_URL, PullProgress};
use tokio_util::sync::CancellationToken;

use crate::events::AppEvent;
use crate::state::AppState;

/// Query the installed models and report the configured model's status
pub async fn refresh_model_status(
    state: &AppState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<ModelStatus> {
    let service = state.config.read().await.service.clone();
    let client = OllamaClient::from_config(&service);

    let list = client.list_models().await;
    let status = ModelStatus::of(&list, &service.model);

    if let Ok(list) = list {
        app_to_ui_tx
            .send(AppEvent::InstalledModels(list.models))
            .await?;
    }
    app_to_ui_tx
        .send(AppEvent::ModelStatus {
            model: service.model,
            status,
        })
        .await?;

    Ok(status)
}

/// Pull the configured model if it is missing, streaming progress to the UI
pub async fn handle_install(
    state: Arc<AppState>,
    force: bool,
    cancel: CancellationToken,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<ModelStatus> {
    let service = state.config.read().await.service.clone();
    let status = refresh_model_status(&state, &app_to_ui_tx).await?;

    match status {
        ModelStatus::Installed if !force => {
            tracing::info!("{} is already installed", service.model);
            return Ok(status);
        }
        ModelStatus::Unknown if !force => {
            anyhow::bail!(
                "Ollama is not reachable at {}; install it from {}",
                service.client_host(),
                OLLAMA_DOWNLOAD_URL
            );
        }
        _ => {}
    }

    app_to_ui_tx
        .send(AppEvent::PullStarted {
            model: service.model.clone(),
        })
        .await?;

    let client = OllamaClient::from_config(&service);
    let outcome = pull_to_end(&client, &service.model, cancel, &app_to_ui_tx).await;

    app_to_ui_tx
        .send(AppEvent::PullProgress(PullProgress::idle()))
        .await?;

    match outcome {
        Ok(()) => {}
        Err(OllamaError::Cancelled) => {
            tracing::warn!("Pull of {} cancelled", service.model);
            app_to_ui_tx
                .send(AppEvent::PullFailed("cancelled".to_string()))
                .await?;
            return refresh_model_status(&state, &app_to_ui_tx).await;
        }
        Err(e) => {
            app_to_ui_tx.send(AppEvent::PullFailed(e.to_string())).await?;
            return Err(e).context(format!("Failed to pull {}", service.model));
        }
    }

    app_to_ui_tx
        .send(AppEvent::PullFinished {
            model: service.model.clone(),
        })
        .await?;

    refresh_model_status(&state, &app_to_ui_tx).await
}

async fn pull_to_end(
    client: &OllamaClient,
    model: &str,
    cancel: CancellationToken,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> Result<(), OllamaError> {
    let mut stream = client.pull(model, cancel).await?;

    while let Some(progress) = stream.next().await {
        let progress = progress?;
        if app_to_ui_tx
            .send(AppEvent::PullProgress(progress))
            .await
            .is_err()
        {
            tracing::warn!("UI channel closed during pull");
        }
    }

    Ok(())
}
