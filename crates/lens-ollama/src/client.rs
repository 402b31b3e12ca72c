use futures_util::StreamExt;
use lens_config::service::ServiceConfig;
use lens_types::ModelList;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{ModelsUnavailable, OllamaError};
use crate::pull::PullStream;

/// Minimal client for the parts of the Ollama HTTP API used for OCR
#[derive(Clone)]
pub struct OllamaClient {
    host: String,
    client: reqwest::Client,
}

impl OllamaClient {
    /// `host` must already be normalized
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), host)
    }

    pub fn with_http(client: reqwest::Client, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            client,
        }
    }

    /// Client for model listing and pulling
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.client_host())
    }

    /// Non-streaming chat completion
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, OllamaError> {
        tracing::debug!(model = %request.model, host = %self.host, "chat request");

        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(request)
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Models installed on the host
    pub async fn list(&self) -> Result<ModelList, OllamaError> {
        let response = self.client.get(self.url("/api/tags")).send().await?;
        let body = check_status(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Like [`list`](Self::list), but failures only mean "unknown"
    pub async fn list_models(&self) -> Result<ModelList, ModelsUnavailable> {
        self.list().await.map_err(|e| {
            tracing::warn!(host = %self.host, "Failed to list installed models: {}", e);
            ModelsUnavailable(e)
        })
    }

    /// Start downloading `model` and return its progress stream
    pub async fn pull(
        &self,
        model: &str,
        cancel: CancellationToken,
    ) -> Result<PullStream, OllamaError> {
        tracing::info!(model, host = %self.host, "pulling model");

        let request = PullRequest {
            model: model.to_string(),
            stream: true,
        };

        let send = self.client.post(self.url("/api/pull")).json(&request).send();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(OllamaError::Cancelled),
            response = send => response?,
        };

        let response = check_status(response).await?;
        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();

        Ok(PullStream::new(chunks, cancel))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }
}

/// Turn non-2xx responses into [`OllamaError::Status`], preferring the server's message
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OllamaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { error }) => error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string(),
    };

    Err(OllamaError::Status {
        status: status.as_u16(),
        message,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    /// Base64 without a data-URL prefix
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl ChatMessage {
    pub fn user_with_image(content: impl Into<String>, image_base64: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            images: vec![image_base64.into()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Serialize)]
struct PullRequest {
    model: String,
    stream: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}
