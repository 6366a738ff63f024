//! # accred-client -- External collaborators of the accreditation portal
//!
//! Typed access to everything outside the process:
//! - the **participant store**, a hosted PostgREST database behind the
//!   [`TicketStore`] trait (with an in-memory variant for development),
//! - the **text generator** (Gemini) used for welcome messages,
//! - the **QR service** that renders badge codes.
//!
//! It also hosts the operations whose correctness depends on store
//! semantics: [`attempt_check_in`], [`Registrar::submit`] and
//! [`verify_admin`].
//!
//! ## Architecture
//!
//! This crate is the only path from the workspace to external services.
//! The API and CLI crates never build HTTP requests to collaborators
//! themselves.

pub mod admin;
pub mod checkin;
pub mod config;
pub mod error;
pub mod genai;
pub mod memory;
pub mod postgrest;
pub mod qr;
pub mod registration;
pub(crate) mod retry;
pub mod store;
pub mod welcome;

pub use admin::verify_admin;
pub use checkin::attempt_check_in;
pub use config::{ConfigError, GenAiConfig, StoreConfig};
pub use error::{CheckInError, GenAiError, RegistrationError, StoreError};
pub use genai::{GeminiClient, TextGenerator};
pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use qr::QrLinks;
pub use registration::{Registrar, MAX_TICKET_ATTEMPTS};
pub use store::TicketStore;
pub use welcome::WelcomeWriter;

use std::sync::Arc;

/// Build the configured store: the hosted database when `config` is set,
/// otherwise `fallback`.
pub fn store_from_config(
    config: Option<&StoreConfig>,
    fallback: impl FnOnce() -> MemoryStore,
) -> Result<Arc<dyn TicketStore>, StoreError> {
    match config {
        Some(cfg) => Ok(Arc::new(PostgrestStore::new(cfg)?)),
        None => Ok(Arc::new(fallback())),
    }
}

/// Build the welcome writer: Gemini when configured, otherwise the fallback
/// template only.
pub fn welcome_from_config(config: Option<&GenAiConfig>) -> Result<WelcomeWriter, GenAiError> {
    match config {
        Some(cfg) => Ok(WelcomeWriter::new(Arc::new(GeminiClient::new(cfg)?))),
        None => Ok(WelcomeWriter::fallback_only()),
    }
}
