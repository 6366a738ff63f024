//! # Ticket Store
//!
//! The authoritative home of participant records and admin credentials.
//! [`PostgrestStore`](crate::postgrest::PostgrestStore) talks to the hosted
//! database; [`MemoryStore`](crate::memory::MemoryStore) backs development
//! runs and tests.
//!
//! ## Write semantics
//!
//! - `insert` fails with [`StoreError::Conflict`] when the ticket is taken.
//! - `mark_checked_in` only touches records that are not checked in yet and
//!   returns `None` when nothing matched. It never overwrites an existing
//!   check-in timestamp.
//! - Writes are never retried.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use accred_core::{Participant, ParticipantId, TicketId};

use crate::error::StoreError;

/// Persistence operations the portal needs.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// All participants, newest registration first.
    async fn fetch_all(&self) -> Result<Vec<Participant>, StoreError>;

    /// The participant holding `ticket`, if any.
    async fn find_by_ticket(&self, ticket: &TicketId) -> Result<Option<Participant>, StoreError>;

    /// Persist a new participant and return the stored record.
    async fn insert(&self, participant: &Participant) -> Result<Participant, StoreError>;

    /// Mark `ticket` checked in at `at` if it is not checked in yet.
    ///
    /// Returns the updated record, or `None` when no unchecked record
    /// matched.
    async fn mark_checked_in(
        &self,
        ticket: &TicketId,
        at: DateTime<Utc>,
    ) -> Result<Option<Participant>, StoreError>;

    /// Delete a participant. Returns whether a record was removed.
    async fn delete(&self, id: ParticipantId) -> Result<bool, StoreError>;

    /// Whether an admin record matches `username` and `password` exactly.
    async fn admin_exists(&self, username: &str, password: &str) -> Result<bool, StoreError>;
}
