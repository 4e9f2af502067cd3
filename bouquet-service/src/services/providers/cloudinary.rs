//! Cloudinary asset store.
//!
//! Implements signed uploads through Cloudinary's Upload API. Uploaded images
//! land in the configured folder and are addressed by their `secure_url`.

use super::{AssetStore, ProviderError, StoredAsset};
use crate::config::CloudinaryConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::time::Instant;

/// Cloudinary client for the Upload API.
#[derive(Clone)]
pub struct CloudinaryStore {
    client: Client,
    config: CloudinaryConfig,
}

/// Upload request body.
#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file: &'a str,
    folder: &'a str,
    timestamp: i64,
    api_key: &'a str,
    signature: String,
}

/// Subset of the upload response we rely on.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Sign upload parameters.
    ///
    /// The signature is computed as:
    /// `SHA1("k1=v1&k2=v2..." + api_secret)` with keys sorted alphabetically.
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.config.api_secret.expose_secret().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl AssetStore for CloudinaryStore {
    async fn upload_image(&self, data_uri: &str) -> Result<StoredAsset, ProviderError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(&[
            ("folder", self.config.folder.clone()),
            ("timestamp", timestamp.to_string()),
        ]);

        let request = UploadRequest {
            file: data_uri,
            folder: &self.config.folder,
            timestamp,
            api_key: &self.config.api_key,
            signature,
        };

        tracing::debug!(
            cloud_name = %self.config.cloud_name,
            folder = %self.config.folder,
            payload_len = data_uri.len(),
            "Uploading image to Cloudinary"
        );

        let started = Instant::now();
        let response = self
            .client
            .post(self.upload_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        crate::services::metrics::observe_provider_latency(self.name(), started.elapsed());

        if !status.is_success() {
            tracing::error!(status = %status, "Cloudinary upload failed");
            return Err(ProviderError::from_response(status, &body));
        }

        let uploaded: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse upload response: {}", e)))?;

        let url = uploaded.secure_url.filter(|u| !u.is_empty()).ok_or_else(|| {
            ProviderError::InvalidResponse("Cloudinary upload response has no secure_url".to_string())
        })?;

        tracing::info!(
            public_id = ?uploaded.public_id,
            url = %url,
            "Image uploaded to Cloudinary"
        );

        Ok(StoredAsset { url })
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}
