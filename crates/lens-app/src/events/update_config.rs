use std::sync::Arc;

use lens_config::RecognitionMode;

use crate::state::AppState;

/// One editable field of the service settings
#[derive(Debug, Clone)]
pub enum ConfigUpdate {
    InstanceName(String),
    Model(String),
    RequestPath(String),
    Mode(RecognitionMode),
    Prompt(String),
}

/// Apply `update` and persist the profile
pub async fn handle_config_update(
    state: Arc<AppState>,
    update: ConfigUpdate,
) -> anyhow::Result<()> {
    {
        let mut config = state.config.write().await;
        let service = &mut config.service;

        match update {
            ConfigUpdate::InstanceName(name) => service.instance_name = name,
            ConfigUpdate::Model(model) => service.model = model,
            ConfigUpdate::RequestPath(path) => service.request_path = path,
            ConfigUpdate::Mode(mode) => service.set_mode(mode),
            ConfigUpdate::Prompt(prompt) => service.set_prompt(prompt),
        }
    }

    state.save_config().await
}
