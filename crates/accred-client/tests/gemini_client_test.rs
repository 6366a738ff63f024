//! Contract tests for GeminiClient and the welcome fallback path.

use std::sync::Arc;

use accred_client::{GeminiClient, GenAiConfig, GenAiError, TextGenerator, WelcomeWriter};
use accred_core::{Salutation, WelcomeRequest};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(&GenAiConfig {
        base_url: server.uri().parse().unwrap(),
        model: "gemini-3-flash-preview".into(),
        api_key: zeroize::Zeroizing::new("gem-key".into()),
        timeout_secs: 5,
    })
    .unwrap()
}

fn request() -> WelcomeRequest {
    WelcomeRequest {
        salutation: Salutation::Monsieur,
        full_name: "Moussa Ndiaye".into(),
        organization: "Orange".into(),
    }
}

#[tokio::test]
async fn generate_posts_prompt_and_reads_first_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "gem-key"))
        .and(body_json(serde_json::json!({
            "contents": [{"parts": [{"text": "Bonjour"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "  Bienvenue, Monsieur.  "}, {"text": "ignored"}]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server).generate("Bonjour").await.unwrap();
    assert_eq!(text, "Bienvenue, Monsieur.");
}

#[tokio::test]
async fn generate_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .mount(&server)
        .await;

    let err = client(&server).generate("x").await.unwrap_err();
    assert!(matches!(err, GenAiError::Api { status: 429, .. }));
}

#[tokio::test]
async fn welcome_writer_uses_generator_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Soyez le bienvenu."}]}}]
        })))
        .mount(&server)
        .await;

    let writer = WelcomeWriter::new(Arc::new(client(&server)));
    assert_eq!(writer.write(&request()).await, "Soyez le bienvenu.");
}

#[tokio::test]
async fn welcome_writer_falls_back_on_empty_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})))
        .mount(&server)
        .await;

    let writer = WelcomeWriter::new(Arc::new(client(&server)));
    let text = writer.write(&request()).await;
    assert!(text.starts_with("Monsieur Moussa Ndiaye, Assirou Sécurité"));
}

#[tokio::test]
async fn welcome_writer_falls_back_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let writer = WelcomeWriter::new(Arc::new(client(&server)));
    assert_eq!(writer.write(&request()).await, request().fallback());
}
