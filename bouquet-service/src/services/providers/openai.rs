//! OpenAI image provider implementation.
//!
//! Calls the Images API (`POST /images/generations`) and returns the
//! artifacts untouched; picking the payload out is the caller's job.

use super::{GeneratedImages, ImageArtifact, ImageProvider, ProviderError};
use crate::config::OpenAiConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// OpenAI provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: Secret<String>,
    pub api_base_url: String,
    pub model: String,
    pub image_size: String,
}

impl OpenAiSettings {
    /// `None` when no API key is configured.
    pub fn from_config(config: &OpenAiConfig) -> Option<Self> {
        config.api_key.clone().map(|api_key| OpenAiSettings {
            api_key,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            image_size: config.image_size.clone(),
        })
    }
}

/// OpenAI image provider.
#[derive(Clone)]
pub struct OpenAiImageProvider {
    client: Client,
    settings: OpenAiSettings,
}

impl OpenAiImageProvider {
    pub fn new(settings: OpenAiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn generations_url(&self) -> String {
        format!("{}/images/generations", self.settings.api_base_url)
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageProvider {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImages, ProviderError> {
        let request = ImageGenerationRequest {
            model: &self.settings.model,
            prompt,
            size: &self.settings.image_size,
            n: 1,
        };

        tracing::debug!(
            model = %self.settings.model,
            size = %self.settings.image_size,
            prompt_len = prompt.len(),
            "Sending request to OpenAI Images API"
        );

        let started = Instant::now();
        let response = self
            .client
            .post(self.generations_url())
            .bearer_auth(self.settings.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        crate::services::metrics::observe_provider_latency(self.name(), started.elapsed());

        if !status.is_success() {
            tracing::warn!(status = %status, "OpenAI Images API returned an error");
            return Err(ProviderError::from_response(status, &body));
        }

        let parsed: ImageGenerationResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let artifacts: Vec<ImageArtifact> = parsed
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|item| ImageArtifact {
                b64_json: item.b64_json,
            })
            .collect();

        tracing::info!(
            model = %self.settings.model,
            artifacts = artifacts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "OpenAI image generation completed"
        );

        Ok(GeneratedImages { artifacts })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Option<Vec<ImageData>>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    b64_json: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_require_api_key() {
        let mut config = OpenAiConfig {
            api_key: None,
            api_base_url: "https://api.openai.com/v1/".to_string(),
            model: "gpt-image-1".to_string(),
            image_size: "1024x1024".to_string(),
        };
        assert!(OpenAiSettings::from_config(&config).is_none());

        config.api_key = Some(Secret::new("sk-test".to_string()));
        let settings = OpenAiSettings::from_config(&config).unwrap();
        assert_eq!(settings.api_base_url, "https://api.openai.com/v1");

        let provider = OpenAiImageProvider::new(settings);
        assert_eq!(
            provider.generations_url(),
            "https://api.openai.com/v1/images/generations"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = ImageGenerationRequest {
            model: "gpt-image-1",
            prompt: "roses",
            size: "1024x1024",
            n: 1,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-image-1",
                "prompt": "roses",
                "size": "1024x1024",
                "n": 1
            })
        );
    }

    #[test]
    fn test_response_without_data_parses() {
        let parsed: ImageGenerationResponse =
            serde_json::from_str(r#"{"created": 1700000000}"#).unwrap();
        assert!(parsed.data.is_none());
    }
}
