use async_trait::async_trait;
use lens_config::service::ServiceConfig;
use lens_types::Language;

use crate::client::{ChatMessage, ChatRequest, OllamaClient};
use crate::error::OllamaError;

/// Image-to-text provider interface
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Extract text from a base64-encoded image
    async fn recognize(
        &self,
        image_base64: &str,
        language: Language,
        config: &ServiceConfig,
    ) -> Result<String, OllamaError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub icon: String,
}

/// Recognizer backed by an Ollama vision model.
///
/// Holds only the HTTP connection pool; the host and model come from the
/// config snapshot passed to each call.
#[derive(Clone, Default)]
pub struct OllamaRecognizer {
    client: reqwest::Client,
}

impl OllamaRecognizer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Recognizer for OllamaRecognizer {
    async fn recognize(
        &self,
        image_base64: &str,
        language: Language,
        config: &ServiceConfig,
    ) -> Result<String, OllamaError> {
        let client = OllamaClient::with_http(self.client.clone(), config.host());

        // The model detects the language on its own
        tracing::debug!(
            language = language.service_code(),
            model = %config.model,
            "recognizing image"
        );

        let request = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage::user_with_image(
                config.prompt.clone(),
                image_base64,
            )],
            stream: false,
        };

        let response = client.chat(&request).await?;

        response
            .message
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .map(|content| content.trim().to_string())
            .ok_or(OllamaError::NoResponse)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: lens_types::SERVICE_NAME.to_string(),
            icon: lens_types::SERVICE_ICON.to_string(),
        }
    }
}
