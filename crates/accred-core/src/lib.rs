#![deny(missing_docs)]

//! # accred-core: Domain Types for the Accreditation Portal
//!
//! Everything the portal knows about participants, tickets and attendance,
//! with no I/O. The hosted database, the text-generation service and the
//! HTTP surface live in `accred-client` and `accred-api`; this crate only
//! depends on `serde`, `thiserror`, `chrono`, `uuid`, `rand` and `csv`.
//!
//! ## Design Principles
//!
//! 1. **Newtype identifiers.** A [`TicketId`] is not a [`ParticipantId`], and
//!    a ticket typed by a human only becomes a `TicketId` through
//!    [`TicketId::normalize`] (trim + uppercase).
//!
//! 2. **Attendance is one field, not two.** A [`Participant`] stores its
//!    check-in state as a single [`Attendance`] value, so "checked in without
//!    a timestamp" cannot be represented. The `checkedIn`/`checkedInAt` pair
//!    only exists on the wire.
//!
//! 3. **The roster is a snapshot.** [`Roster`] is the locally cached copy of
//!    the store's participants. It changes only through named
//!    [`RosterEvent`]s and carries a version and last-synced timestamp.

pub mod catalog;
pub mod checkin;
pub mod error;
pub mod export;
pub mod filter;
pub mod identity;
pub mod participant;
pub mod registration;
pub mod roster;
pub mod stats;
pub mod welcome;

// Re-export primary types at crate root for ergonomic imports.
pub use catalog::Catalog;
pub use checkin::{CheckInOutcome, CheckInPolicy, DuplicateCheckIn};
pub use error::{ExportError, ValidationError};
pub use export::{export_file_name, to_csv_string, write_csv};
pub use filter::{ParticipantFilter, PresenceStatus};
pub use identity::{ParticipantId, TicketId, TicketIssuer};
pub use participant::{Attendance, InterestType, Participant};
pub use registration::{RegistrationForm, Salutation, ValidatedRegistration};
pub use roster::{Roster, RosterEvent, RosterStatus};
pub use stats::DashboardStats;
pub use welcome::WelcomeRequest;
