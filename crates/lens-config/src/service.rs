use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

fn default_instance_name() -> String {
    "Ollama OCR".to_string()
}

fn default_model() -> String {
    "glm-ocr:latest".to_string()
}

fn default_request_path() -> String {
    "http://localhost:11434".to_string()
}

fn default_prompt() -> String {
    RecognitionMode::Text.prompt().to_string()
}

/// What the vision model is asked to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionMode {
    #[default]
    Text,
    Formula,
    Table,
}

impl RecognitionMode {
    pub fn prompt(self) -> &'static str {
        match self {
            RecognitionMode::Text => "Text Recognition:",
            RecognitionMode::Formula => "Formula Recognition:",
            RecognitionMode::Table => "Table Recognition:",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecognitionMode::Text => "text",
            RecognitionMode::Formula => "formula",
            RecognitionMode::Table => "table",
        }
    }
}

impl fmt::Display for RecognitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecognitionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(RecognitionMode::Text),
            "formula" => Ok(RecognitionMode::Formula),
            "table" => Ok(RecognitionMode::Table),
            other => Err(format!("unknown recognition mode: {other}")),
        }
    }
}

/// Settings of one Ollama OCR service instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    #[serde(default = "default_instance_name", alias = "instanceName")]
    pub instance_name: String,
    /// Model identifier, "name:tag"
    #[serde(default = "default_model")]
    pub model: String,
    /// Server base URL, scheme optional
    #[serde(default = "default_request_path", alias = "requestPath")]
    pub request_path: String,
    #[serde(default)]
    pub mode: RecognitionMode,
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            model: default_model(),
            request_path: default_request_path(),
            mode: RecognitionMode::default(),
            prompt: default_prompt(),
        }
    }
}

impl ServiceConfig {
    /// Switching mode overwrites any custom prompt
    pub fn set_mode(&mut self, mode: RecognitionMode) {
        self.mode = mode;
        self.prompt = mode.prompt().to_string();
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Normalized server URL for recognition calls
    pub fn host(&self) -> String {
        normalize_host(&self.request_path)
    }

    /// Server URL for listing and pulling models
    pub fn client_host(&self) -> String {
        client_host(&self.request_path)
    }
}

/// Prefix `https://` when no http(s) scheme is present and drop one trailing slash.
pub fn normalize_host(request_path: &str) -> String {
    let mut host = if has_http_scheme(request_path) {
        request_path.to_string()
    } else {
        format!("https://{request_path}")
    };

    if host.ends_with('/') {
        host.pop();
    }

    host
}

/// Host as the Ollama client library reads it: plain `http://` when no scheme is given.
pub fn client_host(request_path: &str) -> String {
    let mut host = if request_path.contains("://") {
        request_path.to_string()
    } else {
        format!("http://{request_path}")
    };

    if host.ends_with('/') {
        host.pop();
    }

    host
}

fn has_http_scheme(path: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        path.strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty())
    })
}
