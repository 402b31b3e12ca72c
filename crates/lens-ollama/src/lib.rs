mod client;
mod error;
mod pull;
mod recognizer;

pub use client::{ChatMessage, ChatRequest, ChatResponse, OllamaClient, ResponseMessage};
pub use error::{ModelsUnavailable, OllamaError};
pub use pull::PullStream;
pub use recognizer::{OllamaRecognizer, ProviderMetadata, Recognizer};
