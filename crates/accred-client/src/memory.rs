//! In-memory [`TicketStore`] for development runs and tests.
//!
//! Enforces the same uniqueness and conditional-write rules as the hosted
//! store. Admin passwords are compared in constant time.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use accred_core::{Participant, ParticipantId, TicketId};

use crate::error::StoreError;
use crate::store::TicketStore;

struct AdminCredential {
    username: String,
    password: Zeroizing<String>,
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Thread-safe in-memory participant and admin store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    participants: Arc<RwLock<Vec<Participant>>>,
    admins: Arc<RwLock<Vec<AdminCredential>>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("participants", &self.participants.read().len())
            .field("admins", &self.admins.read().len())
            .finish()
    }
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an admin credential.
    pub fn with_admin(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.admins.write().push(AdminCredential {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        });
        self
    }

    /// Seed participants, bypassing uniqueness checks.
    pub fn with_participants(self, participants: impl IntoIterator<Item = Participant>) -> Self {
        self.participants.write().extend(participants);
        self
    }

    /// Copy of every stored participant, in insertion order.
    pub fn snapshot(&self) -> Vec<Participant> {
        self.participants.read().clone()
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<Participant>, StoreError> {
        let mut all = self.participants.read().clone();
        all.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        Ok(all)
    }

    async fn find_by_ticket(&self, ticket: &TicketId) -> Result<Option<Participant>, StoreError> {
        Ok(self
            .participants
            .read()
            .iter()
            .find(|p| &p.ticket_id == ticket)
            .cloned())
    }

    async fn insert(&self, participant: &Participant) -> Result<Participant, StoreError> {
        let mut guard = self.participants.write();
        if guard
            .iter()
            .any(|p| p.ticket_id == participant.ticket_id || p.id == participant.id)
        {
            return Err(StoreError::Conflict {
                endpoint: "memory insert".into(),
            });
        }
        guard.push(participant.clone());
        Ok(participant.clone())
    }

    async fn mark_checked_in(
        &self,
        ticket: &TicketId,
        at: DateTime<Utc>,
    ) -> Result<Option<Participant>, StoreError> {
        let mut guard = self.participants.write();
        let updated = guard
            .iter_mut()
            .find(|p| &p.ticket_id == ticket && !p.checked_in())
            .map(|p| {
                p.check_in(at);
                p.clone()
            });
        Ok(updated)
    }

    async fn delete(&self, id: ParticipantId) -> Result<bool, StoreError> {
        let mut guard = self.participants.write();
        let before = guard.len();
        guard.retain(|p| p.id != id);
        Ok(guard.len() != before)
    }

    async fn admin_exists(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        // Fold over every record so timing does not reveal which one matched.
        let found = self.admins.read().iter().fold(false, |found, admin| {
            let user_ok = constant_time_eq(&admin.username, username);
            let pass_ok = constant_time_eq(&admin.password, password);
            found | (user_ok & pass_ok)
        });
        Ok(found)
    }
}
