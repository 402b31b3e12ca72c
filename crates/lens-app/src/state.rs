use std::sync::Arc;

use lens_config::Config;
use lens_ollama::OllamaRecognizer;
use tokio::sync::RwLock;

use crate::profile::ProfileStore;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub recognizer: OllamaRecognizer,
    pub store: ProfileStore,
    /// Profile the config was loaded from and is saved back to
    pub profile: String,
}

impl AppState {
    pub fn new(config: Config, store: ProfileStore, profile: impl Into<String>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            recognizer: OllamaRecognizer::new(),
            store,
            profile: profile.into(),
        }
    }

    /// Persist the current config to this state's profile
    pub async fn save_config(&self) -> anyhow::Result<()> {
        let config = self.config.read().await.clone();
        self.store.save(&self.profile, &config)?;
        Ok(())
    }
}
