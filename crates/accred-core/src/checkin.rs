//! # Check-in Policy and Outcome
//!
//! A ticket is checked in at most once. What a second scan of the same
//! ticket reports is a deployment choice:
//!
//! - [`CheckInPolicy::Idempotent`] (default) reports success with
//!   `alreadyCheckedIn = true` and the original timestamp.
//! - [`CheckInPolicy::RejectDuplicate`] reports a [`DuplicateCheckIn`] error.
//!
//! Neither policy writes to the store for a repeat scan.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;
use crate::participant::Participant;

/// How a repeat check-in is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInPolicy {
    /// Repeat scans succeed and flag `already_checked_in`.
    #[default]
    Idempotent,
    /// Repeat scans are refused.
    RejectDuplicate,
}

impl CheckInPolicy {
    /// Resolve a scan of a ticket that is already checked in.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateCheckIn`] under [`CheckInPolicy::RejectDuplicate`].
    pub fn on_duplicate(self, participant: Participant) -> Result<CheckInOutcome, DuplicateCheckIn> {
        match self {
            Self::Idempotent => Ok(CheckInOutcome::AlreadyCheckedIn(participant)),
            Self::RejectDuplicate => Err(DuplicateCheckIn {
                participant: Box::new(participant),
            }),
        }
    }
}

impl std::str::FromStr for CheckInPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idempotent" => Ok(Self::Idempotent),
            "reject" | "reject_duplicate" => Ok(Self::RejectDuplicate),
            other => Err(ValidationError::UnknownCheckInPolicy(other.to_string())),
        }
    }
}

/// A repeat check-in refused by [`CheckInPolicy::RejectDuplicate`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("ticket {} was already checked in", participant.ticket_id)]
pub struct DuplicateCheckIn {
    /// The participant as stored, with the original timestamp.
    pub participant: Box<Participant>,
}

/// Result of a check-in attempt that did not fail technically.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckInOutcome {
    /// First check-in; the store confirmed the write.
    CheckedIn(Participant),
    /// The ticket was already checked in; nothing was written.
    AlreadyCheckedIn(Participant),
    /// No participant holds this ticket; nothing was written.
    NotFound,
}

impl CheckInOutcome {
    /// Whether the ticket matched a participant.
    pub fn found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// Whether the participant had been checked in before this attempt.
    pub fn already_checked_in(&self) -> bool {
        matches!(self, Self::AlreadyCheckedIn(_))
    }

    /// The participant, for found tickets.
    pub fn participant(&self) -> Option<&Participant> {
        match self {
            Self::CheckedIn(p) | Self::AlreadyCheckedIn(p) => Some(p),
            Self::NotFound => None,
        }
    }
}
