//! Errors surfaced by `POST /api/generate`.
//!
//! Every variant renders the same `{ "error": ..., "details": ... }` body the
//! frontend expects; only the status code and `details` differ.

use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::ErrorResponse;
use thiserror::Error;

/// Fixed label sent as `error` on every failed generation.
pub const GENERATION_ERROR_LABEL: &str = "Errore generazione AI";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Manca OPENAI_API_KEY nel file .env")]
    MissingCredential,

    #[error("Dati mancanti: servono almeno style e budget")]
    MissingFields,

    #[error("OpenAI ha risposto ma non ha fornito b64_json (risposta inattesa).")]
    MissingImagePayload,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl GenerateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GenerateError::MissingCredential | GenerateError::MissingFields => {
                StatusCode::BAD_REQUEST
            }
            GenerateError::MissingImagePayload | GenerateError::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text returned to the client as `details`.
    pub fn details(&self) -> String {
        match self {
            GenerateError::Provider(err) => err.client_message(),
            other => other.to_string(),
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::MissingCredential => "missing_credential",
            GenerateError::MissingFields => "missing_fields",
            GenerateError::MissingImagePayload => "missing_image_payload",
            GenerateError::Provider(_) => "provider_error",
        }
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                error: GENERATION_ERROR_LABEL.to_string(),
                details: Some(self.details()),
            }),
        )
            .into_response()
    }
}
