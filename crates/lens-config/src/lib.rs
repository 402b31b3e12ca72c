use std::env;

use serde::{Deserialize, Serialize};

use self::service::ServiceConfig;

pub mod service;

pub use service::{RecognitionMode, client_host, normalize_host};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
}

impl Config {
    /// Applied on every start, on top of whatever the profile holds
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("OLLAMA_HOST") {
            self.service.request_path = host;
        }

        if let Some(model) = lookup("LENS_OCR_MODEL") {
            self.service.model = model;
        }
    }
}
