//! # Text Generation (Gemini)
//!
//! `POST {base}/v1beta/models/{model}:generateContent` with the key in the
//! `x-goog-api-key` header. Only the first text part of the first candidate
//! is used.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ConfigError, GenAiConfig};
use crate::error::GenAiError;

/// Produces free text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenAiError>;
}

// -- Wire types ---------------------------------------------------------------

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

// -- Client -------------------------------------------------------------------

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint_url: Url,
}

impl GeminiClient {
    /// Create a client from configuration.
    pub fn new(config: &GenAiConfig) -> Result<Self, GenAiError> {
        let endpoint_url = config
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", config.model))
            .map_err(|e| ConfigError::InvalidUrl("GEMINI_URL".into(), e.to_string()))?;

        let mut key = HeaderValue::from_str(config.api_key.as_str()).map_err(|_| {
            ConfigError::InvalidValue {
                var: "GEMINI_API_KEY".into(),
                message: "not a valid header value".into(),
            }
        })?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", key);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| GenAiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self { http, endpoint_url })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenAiError> {
        let endpoint = "POST :generateContent";
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(self.endpoint_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenAiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GenAiError::Api {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| GenAiError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;
        parsed.first_text().ok_or(GenAiError::Empty)
    }
}
