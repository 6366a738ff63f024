//! Client error types.

use accred_core::checkin::DuplicateCheckIn;
use accred_core::ValidationError;

/// Errors from the participant store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The store returned a non-2xx status.
    #[error("store {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// A uniqueness constraint rejected the write.
    #[error("store {endpoint} rejected a duplicate key")]
    Conflict { endpoint: String },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The store cannot be reached or refused to serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Errors from the text-generation service. Never surfaced past
/// [`WelcomeWriter`](crate::welcome::WelcomeWriter).
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("text generator {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The response carried no usable text.
    #[error("text generator returned no text")]
    Empty,
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Check-in failures. A missing ticket is not an error; see
/// [`CheckInOutcome::NotFound`](accred_core::CheckInOutcome::NotFound).
#[derive(Debug, thiserror::Error)]
pub enum CheckInError {
    /// Repeat scan under the rejecting policy.
    #[error(transparent)]
    Duplicate(#[from] DuplicateCheckIn),
    /// The conditional write matched nothing and the record is still absent.
    #[error("store did not confirm the check-in of {ticket_id}")]
    Unconfirmed { ticket_id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Registration failures.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Every issued ticket collided with an existing one.
    #[error("could not issue a unique ticket after {attempts} attempts")]
    TicketCollision { attempts: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}
