use lens_types::{ModelInfo, ModelStatus, PullProgress};

pub mod install_model;
pub mod recognize_image;
pub mod test_service;
pub mod update_config;

/// Messages from the handlers to the renderer
#[derive(Debug, Clone)]
pub enum AppEvent {
    InstalledModels(Vec<ModelInfo>),
    ModelStatus {
        model: String,
        status: ModelStatus,
    },
    PullStarted {
        model: String,
    },
    PullProgress(PullProgress),
    PullFinished {
        model: String,
    },
    PullFailed(String),
    Recognized(String),
    TestFailed(String),
    ConfigSaved {
        profile: String,
    },
    /// Host should re-read its list of service instances
    ServiceListChanged {
        instance: String,
    },
    Close,
}
