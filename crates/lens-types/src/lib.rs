pub mod language;
pub mod models;
pub mod pull;

pub use language::Language;
pub use models::{ModelInfo, ModelList, ModelStatus};
pub use pull::{PullEvent, PullProgress};

/// Service key used by the host application's service registry
pub const SERVICE_NAME: &str = "ollama_ocr";
pub const SERVICE_ICON: &str = "logo/ollama.png";

/// Where users browse models that can be pulled
pub const MODEL_LIBRARY_URL: &str = "https://ollama.com/library";
/// Shown when the server is unreachable
pub const OLLAMA_DOWNLOAD_URL: &str = "https://ollama.com/download";
