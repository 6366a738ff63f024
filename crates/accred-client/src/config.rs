//! Collaborator configuration.
//!
//! Every endpoint defaults to its production location and can be
//! overridden through environment variables. Secrets are held in
//! [`Zeroizing`] buffers and redacted from `Debug` output.

use url::Url;
use zeroize::Zeroizing;

/// Default Gemini API base.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
/// Default QR image service.
pub const DEFAULT_QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
/// Default request timeout for all collaborators.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosted participant store.
#[derive(Clone)]
pub struct StoreConfig {
    /// Project URL; the REST root is `{url}/rest/v1/`.
    pub url: Url,
    /// Project API key, sent as `apikey` and as bearer token.
    pub api_key: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl StoreConfig {
    /// Load the store configuration from the environment.
    ///
    /// Returns `Ok(None)` when `ACCRED_STORE_URL` is unset. The server then
    /// falls back to the in-memory development store; the CLI refuses to run.
    ///
    /// Variables:
    /// - `ACCRED_STORE_URL` (optional)
    /// - `ACCRED_STORE_KEY` (required when the URL is set)
    /// - `ACCRED_STORE_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(raw) = std::env::var("ACCRED_STORE_URL") else {
            return Ok(None);
        };
        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidUrl("ACCRED_STORE_URL".to_string(), e.to_string()))?;
        let api_key = std::env::var("ACCRED_STORE_KEY").map_err(|_| ConfigError::MissingStoreKey)?;
        Ok(Some(Self {
            url,
            api_key: Zeroizing::new(api_key),
            timeout_secs: env_u64("ACCRED_STORE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        }))
    }
}

/// Connection settings for the Gemini text-generation API.
#[derive(Clone)]
pub struct GenAiConfig {
    /// API base URL.
    pub base_url: Url,
    /// Model name.
    pub model: String,
    /// API key, sent as `x-goog-api-key`.
    pub api_key: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GenAiConfig {
    /// Load the generator configuration from the environment.
    ///
    /// Returns `Ok(None)` when `GEMINI_API_KEY` is unset; welcome messages
    /// then always use the templated fallback.
    ///
    /// Variables:
    /// - `GEMINI_API_KEY` (optional)
    /// - `GEMINI_MODEL` (default: `gemini-3-flash-preview`)
    /// - `GEMINI_URL` (default: `https://generativelanguage.googleapis.com`)
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(api_key) = std::env::var("GEMINI_API_KEY") else {
            return Ok(None);
        };
        Ok(Some(Self {
            base_url: env_url("GEMINI_URL", DEFAULT_GEMINI_URL)?,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            api_key: Zeroizing::new(api_key),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }))
    }
}

/// QR image service base, from `QR_SERVICE_URL`.
pub fn qr_service_url_from_env() -> Result<Url, ConfigError> {
    env_url("QR_SERVICE_URL", DEFAULT_QR_SERVICE_URL)
}

pub(crate) fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_u64(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ACCRED_STORE_KEY environment variable is required when ACCRED_STORE_URL is set")]
    MissingStoreKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}
