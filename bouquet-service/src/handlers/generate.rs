//! `POST /api/generate`: bouquet description plus generated image.

use crate::error::GenerateError;
use crate::models::{GenerationRequest, GenerationResult};
use crate::services::compose;
use crate::services::metrics::record_generation;
use crate::services::providers::png_data_uri;
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, Json};

/// Generate a bouquet description and image.
///
/// The body is read raw so that malformed JSON reaches the same validation
/// error as a missing field instead of an extractor rejection.
pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerationResult>, GenerateError> {
    match run_generation(&state, &body).await {
        Ok(result) => {
            record_generation("success");
            Ok(Json(result))
        }
        Err(err) => {
            tracing::error!(
                error = ?err,
                kind = err.kind(),
                details = %err.details(),
                "Bouquet generation failed"
            );
            record_generation(err.kind());
            Err(err)
        }
    }
}

async fn run_generation(state: &AppState, body: &[u8]) -> Result<GenerationResult, GenerateError> {
    let provider = state
        .image_provider
        .as_ref()
        .ok_or(GenerateError::MissingCredential)?;

    let spec = GenerationRequest::from_body(body).validate()?;

    let text = compose::describe(&spec);
    let prompt = compose::image_prompt(&spec);

    tracing::info!(
        style = %spec.style,
        budget = %spec.budget,
        provider = provider.name(),
        "Generating bouquet image"
    );

    let image_base64 = provider
        .generate_image(&prompt)
        .await?
        .into_first_b64()
        .ok_or(GenerateError::MissingImagePayload)?;

    // An upload failure fails the whole request; no partial result is returned.
    let image_url = match &state.asset_store {
        Some(store) => Some(store.upload_image(&png_data_uri(&image_base64)).await?.url),
        None => None,
    };

    Ok(GenerationResult {
        text,
        image_base64,
        image_url,
    })
}
