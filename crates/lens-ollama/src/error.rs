#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("No response from Ollama")]
    NoResponse,

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Error reported inside a streamed response
    #[error("Ollama error: {0}")]
    Server(String),

    #[error("Pull cancelled")]
    Cancelled,
}

/// The installed-model list could not be fetched.
///
/// Kept apart from an empty list so callers can tell "nothing installed"
/// from "server unreachable".
#[derive(Debug, thiserror::Error)]
#[error("installed models unavailable: {0}")]
pub struct ModelsUnavailable(#[source] pub OllamaError);
