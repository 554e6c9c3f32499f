//! Gemini client tests against a mock server.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roomstyle::adapter::outbound::gemini::Gemini;
use roomstyle::domain::Credential;
use roomstyle::error::{CredentialError, Error, Result, TransformError};
use roomstyle::infrastructure::config::gemini::GeminiConfig;
use roomstyle::port::outbound::generator::{GenerateRequest, GeneratedImage, ImageGenerator};

const KEY: &str = "AIzaSyMockKey";
const MODEL_PATH: &str = "/v1beta/models/gemini-2.0-flash-exp-image-generation:generateContent";

fn client(server: &MockServer) -> Gemini {
    Gemini::new(GeminiConfig {
        base_url: server.uri(),
        ..GeminiConfig::default()
    })
}

fn credential() -> Credential {
    Credential::new(KEY).unwrap()
}

async fn generate(gemini: &Gemini) -> Result<Option<GeneratedImage>> {
    let credential = credential();
    gemini
        .generate(GenerateRequest {
            credential: &credential,
            image: b"room pixels",
            mime_type: "image/jpeg",
            prompt: "Transform this room into a Modern style",
        })
        .await
}

#[tokio::test]
async fn sends_image_and_prompt_and_decodes_the_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", KEY))
        .and(body_partial_json(json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "inlineData": { "mimeType": "image/jpeg", "data": STANDARD.encode(b"room pixels") } },
                    { "text": "Transform this room into a Modern style" }
                ]
            }],
            "generationConfig": {
                "responseModalities": ["Text", "Image"],
                "topK": 40,
                "maxOutputTokens": 8192
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your room." },
                        { "inlineData": { "mimeType": "image/png", "data": STANDARD.encode(b"new room") } }
                    ]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let image = generate(&client(&server)).await.unwrap().unwrap();
    assert_eq!(image.data, b"new room");
    assert_eq!(image.mime_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn text_only_response_yields_no_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I cannot do that." }] } }]
        })))
        .mount(&server)
        .await;

    assert!(generate(&client(&server)).await.unwrap().is_none());
}

#[tokio::test]
async fn empty_candidates_yield_no_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    assert!(generate(&client(&server)).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_key_is_a_credential_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{ "reason": "API_KEY_INVALID" }]
            }
        })))
        .mount(&server)
        .await;

    let err = generate(&client(&server)).await.unwrap_err();
    assert!(err.is_credential());
    assert!(matches!(
        err,
        Error::Credential(CredentialError::Rejected(ref msg)) if msg.starts_with("API key not valid")
    ));
}

#[tokio::test]
async fn server_error_is_a_transform_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": 500, "message": "Internal error encountered." }
        })))
        .mount(&server)
        .await;

    let err = generate(&client(&server)).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transform(TransformError::Remote(ref msg)) if msg.contains("Internal error encountered.")
    ));
}

#[tokio::test]
async fn malformed_body_is_a_transform_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = generate(&client(&server)).await.unwrap_err();
    assert!(matches!(err, Error::Transform(TransformError::Remote(_))));
}

#[tokio::test]
async fn connection_test_uses_the_text_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", KEY))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "Test connection" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Connected." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).test_connection(&credential()).await.unwrap();
}

#[tokio::test]
async fn connection_test_reports_rejected_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = client(&server)
        .test_connection(&credential())
        .await
        .unwrap_err();
    assert!(err.is_credential());
}
