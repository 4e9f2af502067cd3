//! Router-level tests for `POST /api/generate` using mock providers.

mod common;

use axum::http::StatusCode;
use bouquet_service::build_router;
use bouquet_service::services::providers::mock::{MockAssetStore, MockImageProvider};
use bouquet_service::services::providers::{
    GeneratedImages, ImageArtifact, ProviderError,
};
use common::{post_generate, post_raw, state_with, TEST_IMAGE_B64};
use serde_json::json;
use std::sync::Arc;

const LABEL: &str = "Errore generazione AI";
const MISSING_FIELDS: &str = "Dati mancanti: servono almeno style e budget";

#[tokio::test]
async fn missing_api_key_is_rejected_before_validation() {
    let router = build_router(state_with(None, None));

    let (status, body) = post_raw(router, "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], LABEL);
    assert_eq!(body["details"], "Manca OPENAI_API_KEY nel file .env");
}

#[tokio::test]
async fn missing_fields_never_reach_the_provider() {
    let provider = Arc::new(MockImageProvider::with_image(TEST_IMAGE_B64));

    for payload in [
        json!({ "budget": 50 }),
        json!({ "style": "", "budget": 50 }),
        json!({ "style": "romantico" }),
        json!({ "style": "romantico", "budget": null }),
    ] {
        let router = build_router(state_with(Some(provider.clone()), None));
        let (status, body) = post_generate(router, payload.clone()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["error"], LABEL);
        assert_eq!(body["details"], MISSING_FIELDS);
    }

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let provider = Arc::new(MockImageProvider::with_image(TEST_IMAGE_B64));
    let router = build_router(state_with(Some(provider.clone()), None));

    let (status, body) = post_raw(router, "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], MISSING_FIELDS);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn budget_below_floor_uses_floor_in_text_and_prompt() {
    let provider = Arc::new(MockImageProvider::with_image(TEST_IMAGE_B64));
    let router = build_router(state_with(Some(provider.clone()), None));

    let (status, body) = post_generate(
        router,
        json!({ "style": "romantico", "occasion": "anniversario", "budget": 10 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("Bouquet romantico."));
    assert!(text.contains("Occasione: anniversario"));
    assert!(text.contains("Budget: 35€."));
    assert_eq!(body["image_base64"], TEST_IMAGE_B64);
    assert!(body.get("image_url").is_none());

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("consistent with a 35 EUR bouquet"));
    assert!(prompts[0].contains("Occasion: anniversario."));
}

#[tokio::test]
async fn non_numeric_and_negative_budgets_use_floor() {
    for budget in [json!(-20), json!(0), json!("molto"), json!("")] {
        let provider = Arc::new(MockImageProvider::with_image(TEST_IMAGE_B64));
        let router = build_router(state_with(Some(provider), None));

        let (status, body) =
            post_generate(router, json!({ "style": "Moderno", "budget": budget.clone() })).await;

        assert_eq!(status, StatusCode::OK, "{budget}");
        assert!(body["text"].as_str().unwrap().contains("Budget: 35€."), "{budget}");
    }
}

#[tokio::test]
async fn budget_above_floor_is_used_verbatim() {
    let provider = Arc::new(MockImageProvider::with_image(TEST_IMAGE_B64));
    let router = build_router(state_with(Some(provider.clone()), None));

    let (status, body) = post_generate(
        router,
        json!({ "style": "ELEGANTE", "budget": "80", "palette": "bianco", "size": "grande" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().unwrap();
    assert!(text.starts_with("Bouquet elegante.\n"));
    assert!(text.contains("Palette: bianco"));
    assert!(text.contains("Dimensione: grande"));
    assert!(text.contains("Budget: 80€."));
    assert!(provider.prompts()[0].contains("a 80 EUR bouquet"));
}

#[tokio::test]
async fn missing_image_payload_is_a_server_error() {
    let provider = Arc::new(MockImageProvider::with_images(GeneratedImages {
        artifacts: vec![
            ImageArtifact::default(),
            ImageArtifact {
                b64_json: Some(TEST_IMAGE_B64.to_string()),
            },
        ],
    }));
    let router = build_router(state_with(Some(provider), None));

    let (status, body) = post_generate(router, json!({ "style": "romantico", "budget": 40 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], LABEL);
    assert_eq!(
        body["details"],
        "OpenAI ha risposto ma non ha fornito b64_json (risposta inattesa)."
    );
}

#[tokio::test]
async fn empty_artifact_list_is_a_server_error() {
    let provider = Arc::new(MockImageProvider::with_images(GeneratedImages::default()));
    let router = build_router(state_with(Some(provider), None));

    let (status, body) = post_generate(router, json!({ "style": "romantico", "budget": 40 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["details"],
        "OpenAI ha risposto ma non ha fornito b64_json (risposta inattesa)."
    );
}

#[tokio::test]
async fn provider_failure_surfaces_provider_message() {
    let provider = Arc::new(MockImageProvider::failing(|| ProviderError::Api {
        status: 400,
        message: "Billing hard limit has been reached.".to_string(),
    }));
    let router = build_router(state_with(Some(provider), None));

    let (status, body) = post_generate(router, json!({ "style": "romantico", "budget": 40 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], LABEL);
    assert_eq!(body["details"], "Billing hard limit has been reached.");
}

#[tokio::test]
async fn configured_asset_store_adds_image_url() {
    let provider = Arc::new(MockImageProvider::with_image(TEST_IMAGE_B64));
    let store = Arc::new(MockAssetStore::with_url(
        "https://res.cloudinary.com/demo/image/upload/bouquet-ai/abc.png",
    ));
    let router = build_router(state_with(Some(provider), Some(store.clone())));

    let (status, body) = post_generate(router, json!({ "style": "romantico", "budget": 50 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["image_url"],
        "https://res.cloudinary.com/demo/image/upload/bouquet-ai/abc.png"
    );
    assert_eq!(body["image_base64"], TEST_IMAGE_B64);
    assert_eq!(
        store.uploads(),
        vec![format!("data:image/png;base64,{}", TEST_IMAGE_B64)]
    );
}

#[tokio::test]
async fn upload_failure_fails_the_whole_request() {
    let provider = Arc::new(MockImageProvider::with_image(TEST_IMAGE_B64));
    let store = Arc::new(MockAssetStore::failing(|| {
        ProviderError::Network("connection reset by peer".to_string())
    }));
    let router = build_router(state_with(Some(provider.clone()), Some(store)));

    let (status, body) = post_generate(router, json!({ "style": "romantico", "budget": 50 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["details"], "connection reset by peer");
    assert!(body.get("text").is_none());
    assert!(body.get("image_base64").is_none());
    assert_eq!(provider.calls(), 1);
}
