//! External provider abstractions and implementations.
//!
//! Image generation and asset hosting sit behind traits so the handler can be
//! driven by the real HTTP clients (OpenAI, Cloudinary) or by mocks.

pub mod cloudinary;
pub mod mock;
pub mod openai;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Message safe to hand back to the caller: the provider's own message
    /// when it sent one, otherwise the underlying error text.
    pub fn client_message(&self) -> String {
        match self {
            ProviderError::Api { message, .. } => message.clone(),
            ProviderError::Network(msg)
            | ProviderError::InvalidResponse(msg) => msg.clone(),
        }
    }

    /// Build an `Api` error from a non-success response body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        ProviderError::Api {
            status: status.as_u16(),
            message: error_message_from_body(status, body),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

/// Error body shape shared by OpenAI and Cloudinary: `{"error": {"message": ..}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Raw error bodies (HTML error pages, proxies) are cut to this many characters.
const MAX_RAW_DETAIL_CHARS: usize = 300;

fn error_message_from_body(status: StatusCode, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.message)
        .filter(|m| !m.is_empty())
    {
        return message;
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return match trimmed.char_indices().nth(MAX_RAW_DETAIL_CHARS) {
            Some((cut, _)) => format!("{}…", &trimmed[..cut]),
            None => trimmed.to_string(),
        };
    }

    status
        .canonical_reason()
        .map(|reason| format!("{} {}", status.as_u16(), reason))
        .unwrap_or_else(|| status.to_string())
}

/// One generated image as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageArtifact {
    pub b64_json: Option<String>,
}

/// All artifacts from a single generation call, in provider order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedImages {
    pub artifacts: Vec<ImageArtifact>,
}

impl GeneratedImages {
    /// Base64 payload of the first artifact, if the provider included one.
    pub fn into_first_b64(self) -> Option<String> {
        self.artifacts
            .into_iter()
            .next()
            .and_then(|artifact| artifact.b64_json)
            .filter(|b64| !b64.is_empty())
    }
}

/// A hosted copy of an uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub url: String,
}

/// Trait for image generation providers (e.g., OpenAI Images).
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate images for `prompt`, waiting for the full response.
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImages, ProviderError>;

    /// Provider name used in logs and metrics.
    fn name(&self) -> &'static str;
}

/// Trait for asset hosts that store generated images (e.g., Cloudinary).
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload an image given as a `data:` URI and return its hosted URL.
    async fn upload_image(&self, data_uri: &str) -> Result<StoredAsset, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Wrap a base64 PNG payload as a `data:` URI.
pub fn png_data_uri(b64: &str) -> String {
    format!("data:image/png;base64,{}", b64)
}
