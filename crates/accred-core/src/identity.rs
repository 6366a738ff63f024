//! # Identity Newtypes
//!
//! [`ParticipantId`] is the opaque store key, always valid by construction.
//! [`TicketId`] is the human-facing code printed on the badge
//! (`AS-2026-0421`) and is the only key staff ever type or scan.
//!
//! ## Normalization
//!
//! Staff type tickets in whatever case the keyboard produces. Every lookup
//! goes through [`TicketId::normalize`], which trims surrounding whitespace
//! and uppercases, so `" as-2026-0007 "` and `"AS-2026-0007"` are the same key.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Default prefix for issued tickets.
pub const DEFAULT_TICKET_PREFIX: &str = "AS-2026";

/// Lowest issued numeric suffix. Suffixes are always four digits.
const SUFFIX_MIN: u16 = 1000;
/// Highest issued numeric suffix.
const SUFFIX_MAX: u16 = 9999;

// ---------------------------------------------------------------------------
// ParticipantId
// ---------------------------------------------------------------------------

/// Opaque unique identifier of one registration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Create a new random participant identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a participant identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TicketId
// ---------------------------------------------------------------------------

/// Public ticket code, stored and compared in uppercase.
///
/// Deserialization is transparent: values coming back from the store were
/// normalized when they were issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Normalize operator input into a ticket identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTicketId`] when nothing but whitespace
    /// was supplied.
    pub fn normalize(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().to_uppercase();
        if cleaned.is_empty() {
            return Err(ValidationError::EmptyTicketId);
        }
        Ok(Self(cleaned))
    }

    /// Whether this ticket has the shape `{prefix}-NNNN`.
    ///
    /// Malformed input is still a valid lookup key (it simply never
    /// matches); this is only used to reject garbage early in the CLI.
    pub fn is_well_formed(&self, prefix: &str) -> bool {
        match self.0.strip_prefix(prefix).and_then(|rest| rest.strip_prefix('-')) {
            Some(suffix) => suffix.len() == 4 && suffix.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }

    /// Access the ticket string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TicketId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

// ---------------------------------------------------------------------------
// TicketIssuer
// ---------------------------------------------------------------------------

/// Issues fresh ticket codes: a fixed prefix plus a random four-digit suffix.
///
/// The issuer does not know which tickets exist. Uniqueness is enforced by
/// the store, and registration retries with a new code on conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketIssuer {
    prefix: String,
}

impl TicketIssuer {
    /// Create an issuer for the given prefix (normalized to uppercase).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTicketPrefix`] if the prefix is empty
    /// or contains anything other than ASCII letters, digits and dashes.
    pub fn new(prefix: &str) -> Result<Self, ValidationError> {
        let prefix = prefix.trim().to_uppercase();
        let valid = !prefix.is_empty()
            && !prefix.ends_with('-')
            && prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(ValidationError::InvalidTicketPrefix(prefix));
        }
        Ok(Self { prefix })
    }

    /// The prefix every issued ticket starts with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Issue a ticket using the given random source.
    pub fn issue_with<R: Rng + ?Sized>(&self, rng: &mut R) -> TicketId {
        let suffix = rng.gen_range(SUFFIX_MIN..=SUFFIX_MAX);
        TicketId(format!("{}-{suffix:04}", self.prefix))
    }

    /// Issue a ticket using the thread-local random source.
    pub fn issue(&self) -> TicketId {
        self.issue_with(&mut rand::thread_rng())
    }
}

impl Default for TicketIssuer {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_TICKET_PREFIX.to_string(),
        }
    }
}
