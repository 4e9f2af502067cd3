//! Mock provider implementations for testing.

use super::{
    AssetStore, GeneratedImages, ImageArtifact, ImageProvider, ProviderError, StoredAsset,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Canned outcome for a mock call.
pub enum MockOutcome<T> {
    Ok(T),
    Err(fn() -> ProviderError),
}

/// Mock image provider that records the prompts it receives.
pub struct MockImageProvider {
    outcome: MockOutcome<GeneratedImages>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockImageProvider {
    /// Provider answering with a single artifact carrying `b64`.
    pub fn with_image(b64: &str) -> Self {
        Self::with_images(GeneratedImages {
            artifacts: vec![ImageArtifact {
                b64_json: Some(b64.to_string()),
            }],
        })
    }

    pub fn with_images(images: GeneratedImages) -> Self {
        Self {
            outcome: MockOutcome::Ok(images),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> ProviderError) -> Self {
        Self {
            outcome: MockOutcome::Err(error),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImages, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.outcome {
            MockOutcome::Ok(images) => Ok(images.clone()),
            MockOutcome::Err(make_error) => Err(make_error()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Mock asset store returning a fixed URL.
pub struct MockAssetStore {
    outcome: MockOutcome<StoredAsset>,
    uploads: Mutex<Vec<String>>,
}

impl MockAssetStore {
    pub fn with_url(url: &str) -> Self {
        Self {
            outcome: MockOutcome::Ok(StoredAsset {
                url: url.to_string(),
            }),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> ProviderError) -> Self {
        Self {
            outcome: MockOutcome::Err(error),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Data URIs received so far.
    pub fn uploads(&self) -> Vec<String> {
        self.uploads
            .lock()
            .map(|uploads| uploads.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AssetStore for MockAssetStore {
    async fn upload_image(&self, data_uri: &str) -> Result<StoredAsset, ProviderError> {
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(data_uri.to_string());
        }

        match &self.outcome {
            MockOutcome::Ok(asset) => Ok(asset.clone()),
            MockOutcome::Err(make_error) => Err(make_error()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
