use serde::{Deserialize, Serialize};

/// Response of the tags endpoint: the models installed on a host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub modified_at: Option<String>,
}

impl ModelList {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }

    /// Exact name match, tag included
    pub fn contains(&self, model: &str) -> bool {
        self.names().any(|name| name == model)
    }
}

/// Installation state of the configured model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Installed,
    NotInstalled,
    /// Model list could not be fetched; the server is probably not running
    Unknown,
}

impl ModelStatus {
    pub fn of<E>(list: &Result<ModelList, E>, model: &str) -> Self {
        match list {
            Ok(list) if list.contains(model) => ModelStatus::Installed,
            Ok(_) => ModelStatus::NotInstalled,
            Err(_) => ModelStatus::Unknown,
        }
    }
}
