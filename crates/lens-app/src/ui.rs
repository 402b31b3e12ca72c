use kanal::AsyncReceiver;
use lens_types::{MODEL_LIBRARY_URL, ModelInfo, ModelStatus, OLLAMA_DOWNLOAD_URL, PullProgress};

use crate::events::AppEvent;

/// Terminal renderer for handler events. Runs until [`AppEvent::Close`].
pub async fn ui_loop(app_to_ui_rx: AsyncReceiver<AppEvent>) -> anyhow::Result<()> {
    let mut last_progress = PullProgress::idle();

    while let Ok(event) = app_to_ui_rx.recv().await {
        match event {
            AppEvent::InstalledModels(models) => {
                for model in &models {
                    println!("  {}", model_line(model));
                }
            }
            AppEvent::ModelStatus { model, status } => {
                println!("{model}: {}", badge(status));
                match status {
                    ModelStatus::NotInstalled => {
                        println!("  run `lens install` to pull it ({MODEL_LIBRARY_URL})");
                    }
                    ModelStatus::Unknown => {
                        println!("  install Ollama: {OLLAMA_DOWNLOAD_URL}");
                    }
                    ModelStatus::Installed => {}
                }
            }
            AppEvent::PullStarted { model } => {
                println!("Pulling {model}...");
            }
            AppEvent::PullProgress(progress) => {
                if progress != last_progress && !progress.status.is_empty() {
                    println!("[{:>3}%] {}", progress.percent, progress.status);
                }
                last_progress = progress;
            }
            AppEvent::PullFinished { model } => {
                println!("Pulled {model}");
            }
            AppEvent::PullFailed(reason) => {
                println!("Pull failed: {reason}");
            }
            AppEvent::Recognized(text) => {
                println!("{text}");
            }
            AppEvent::TestFailed(message) => {
                eprintln!("{message}");
            }
            AppEvent::ConfigSaved { profile } => {
                tracing::info!("Saved profile {profile}");
            }
            AppEvent::ServiceListChanged { instance } => {
                tracing::debug!("Service list changed: {instance}");
            }
            AppEvent::Close => break,
        }
    }

    Ok(())
}

fn badge(status: ModelStatus) -> &'static str {
    match status {
        ModelStatus::Installed => "ready",
        ModelStatus::NotInstalled => "not installed",
        ModelStatus::Unknown => "Ollama not reachable",
    }
}

fn model_line(model: &ModelInfo) -> String {
    let mut line = model.name.clone();
    if let Some(digest) = &model.digest {
        let digest = digest.strip_prefix("sha256:").unwrap_or(digest);
        let short: String = digest.chars().take(12).collect();
        line.push_str(&format!("  {short}"));
    }
    if let Some(size) = model.size {
        line.push_str(&format!("  {:.1} GB", size as f64 / 1e9));
    }
    if let Some(modified_at) = &model.modified_at {
        line.push_str(&format!("  {modified_at}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_follows_the_reported_status() {
        assert_eq!(badge(ModelStatus::Installed), "ready");
        assert_eq!(badge(ModelStatus::NotInstalled), "not installed");
        assert_eq!(badge(ModelStatus::Unknown), "Ollama not reachable");
    }

    #[test]
    fn model_line_shows_short_digest_and_size() {
        let model = ModelInfo {
            name: "glm-ocr:latest".into(),
            size: Some(2_200_000_000),
            digest: Some("sha256:0123456789abcdef0123".into()),
            modified_at: Some("2025-01-01T00:00:00Z".into()),
        };
        assert_eq!(
            model_line(&model),
            "glm-ocr:latest  0123456789ab  2.2 GB  2025-01-01T00:00:00Z"
        );
    }

    #[test]
    fn model_line_without_details_is_the_name() {
        let model = ModelInfo {
            name: "llava:7b".into(),
            size: None,
            digest: None,
            modified_at: None,
        };
        assert_eq!(model_line(&model), "llava:7b");
    }
}
