//! # Check-in Operation
//!
//! Looks a ticket up in the store and, if it is not checked in yet,
//! persists the check-in through a conditional write. Exactly one store
//! write happens for a successful first check-in; repeat scans and unknown
//! tickets write nothing. Nothing is retried.
//!
//! The conditional write only matches unchecked records, so two devices
//! scanning the same badge concurrently produce one timestamp. The loser's
//! write matches zero rows; the record is then re-read and reported through
//! the [`CheckInPolicy`] as a repeat scan.

use chrono::{DateTime, Utc};

use accred_core::{CheckInOutcome, CheckInPolicy, TicketId};

use crate::error::CheckInError;
use crate::store::TicketStore;

/// Attempt to check in the ticket typed or scanned as `input`.
///
/// `input` is trimmed and uppercased before lookup; blank input matches
/// nothing.
///
/// # Errors
///
/// - [`CheckInError::Duplicate`] for repeat scans under
///   [`CheckInPolicy::RejectDuplicate`].
/// - [`CheckInError::Store`] when the store fails. No state changed.
pub async fn attempt_check_in(
    store: &dyn TicketStore,
    input: &str,
    policy: CheckInPolicy,
    now: DateTime<Utc>,
) -> Result<CheckInOutcome, CheckInError> {
    let Ok(ticket) = TicketId::normalize(input) else {
        return Ok(CheckInOutcome::NotFound);
    };

    let Some(participant) = store.find_by_ticket(&ticket).await? else {
        tracing::info!(ticket_id = %ticket, "check-in for unknown ticket");
        return Ok(CheckInOutcome::NotFound);
    };

    if participant.checked_in() {
        tracing::info!(ticket_id = %ticket, participant_id = %participant.id, "repeat check-in");
        return Ok(policy.on_duplicate(participant)?);
    }

    if let Some(updated) = store.mark_checked_in(&ticket, now).await? {
        tracing::info!(ticket_id = %ticket, participant_id = %updated.id, "participant checked in");
        return Ok(CheckInOutcome::CheckedIn(updated));
    }

    // Zero rows: another device checked this ticket in (or deleted it)
    // between the lookup and the write.
    match store.find_by_ticket(&ticket).await? {
        Some(current) if current.checked_in() => {
            tracing::info!(ticket_id = %ticket, "concurrent check-in won the race");
            Ok(policy.on_duplicate(current)?)
        }
        Some(_) => Err(CheckInError::Unconfirmed {
            ticket_id: ticket.to_string(),
        }),
        None => Ok(CheckInOutcome::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::memory::MemoryStore;
    use accred_core::{Participant, ParticipantId, RegistrationForm};
    use async_trait::async_trait;

    fn participant(ticket: &str) -> Participant {
        let form = RegistrationForm {
            first_name: "Moussa".into(),
            last_name: "Ndiaye".into(),
            email: "moussa@example.sn".into(),
            phone: "781112233".into(),
            ..RegistrationForm::default()
        };
        Participant::from_registration(
            form.validate().unwrap(),
            TicketId::normalize(ticket).unwrap(),
            "Bienvenue".into(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn padded_lowercase_ticket_checks_in() {
        let store = MemoryStore::new().with_participants([participant("AS-2026-0007")]);
        let before = Utc::now();

        let outcome = attempt_check_in(&store, " as-2026-0007 ", CheckInPolicy::Idempotent, Utc::now())
            .await
            .unwrap();

        let p = outcome.participant().unwrap();
        assert!(matches!(outcome, CheckInOutcome::CheckedIn(_)));
        assert!(p.checked_in());
        assert!(p.checked_in_at().unwrap() >= before);
        assert!(store.snapshot()[0].checked_in());
    }

    #[tokio::test]
    async fn lowercase_and_uppercase_are_identical() {
        let lower = MemoryStore::new().with_participants([participant("AS-2026-1234")]);
        let upper = MemoryStore::new().with_participants([participant("AS-2026-1234")]);
        let now = Utc::now();

        let a = attempt_check_in(&lower, "as-2026-1234", CheckInPolicy::Idempotent, now)
            .await
            .unwrap();
        let b = attempt_check_in(&upper, "AS-2026-1234", CheckInPolicy::Idempotent, now)
            .await
            .unwrap();
        assert!(matches!(a, CheckInOutcome::CheckedIn(_)));
        assert!(matches!(b, CheckInOutcome::CheckedIn(_)));
        assert_eq!(
            a.participant().unwrap().checked_in_at(),
            b.participant().unwrap().checked_in_at()
        );
    }

    #[tokio::test]
    async fn unknown_ticket_is_not_found_and_mutates_nothing() {
        let store = MemoryStore::new().with_participants([participant("AS-2026-0001")]);
        let before = store.snapshot();

        for input in ["AS-2026-9999", "", "   "] {
            let outcome = attempt_check_in(&store, input, CheckInPolicy::Idempotent, Utc::now())
                .await
                .unwrap();
            assert_eq!(outcome, CheckInOutcome::NotFound);
        }
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn repeat_scan_keeps_first_timestamp() {
        let store = MemoryStore::new().with_participants([participant("AS-2026-0002")]);
        let first = Utc::now();
        attempt_check_in(&store, "AS-2026-0002", CheckInPolicy::Idempotent, first)
            .await
            .unwrap();

        let later = first + chrono::Duration::minutes(10);
        let outcome = attempt_check_in(&store, "AS-2026-0002", CheckInPolicy::Idempotent, later)
            .await
            .unwrap();
        assert!(outcome.already_checked_in());
        assert_eq!(outcome.participant().unwrap().checked_in_at(), Some(first));

        let err = attempt_check_in(&store, "AS-2026-0002", CheckInPolicy::RejectDuplicate, later)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckInError::Duplicate(_)));
    }

    /// Serves reads from an inner store but fails every check-in write.
    struct FailingWrites(MemoryStore);

    #[async_trait]
    impl TicketStore for FailingWrites {
        async fn fetch_all(&self) -> Result<Vec<Participant>, StoreError> {
            self.0.fetch_all().await
        }
        async fn find_by_ticket(&self, t: &TicketId) -> Result<Option<Participant>, StoreError> {
            self.0.find_by_ticket(t).await
        }
        async fn insert(&self, p: &Participant) -> Result<Participant, StoreError> {
            self.0.insert(p).await
        }
        async fn mark_checked_in(
            &self,
            _: &TicketId,
            _: DateTime<Utc>,
        ) -> Result<Option<Participant>, StoreError> {
            Err(StoreError::Unavailable("write refused".into()))
        }
        async fn delete(&self, id: ParticipantId) -> Result<bool, StoreError> {
            self.0.delete(id).await
        }
        async fn admin_exists(&self, u: &str, p: &str) -> Result<bool, StoreError> {
            self.0.admin_exists(u, p).await
        }
    }

    #[tokio::test]
    async fn failed_write_reports_failure_and_changes_nothing() {
        let inner = MemoryStore::new().with_participants([participant("AS-2026-0003")]);
        let store = FailingWrites(inner.clone());

        let err = attempt_check_in(&store, "AS-2026-0003", CheckInPolicy::Idempotent, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckInError::Store(StoreError::Unavailable(_))));
        assert!(!inner.snapshot()[0].checked_in());
    }

    /// Simulates another device winning the race between lookup and write.
    struct LosesRace(MemoryStore);

    #[async_trait]
    impl TicketStore for LosesRace {
        async fn fetch_all(&self) -> Result<Vec<Participant>, StoreError> {
            self.0.fetch_all().await
        }
        async fn find_by_ticket(&self, t: &TicketId) -> Result<Option<Participant>, StoreError> {
            self.0.find_by_ticket(t).await
        }
        async fn insert(&self, p: &Participant) -> Result<Participant, StoreError> {
            self.0.insert(p).await
        }
        async fn mark_checked_in(
            &self,
            t: &TicketId,
            at: DateTime<Utc>,
        ) -> Result<Option<Participant>, StoreError> {
            let earlier = at - chrono::Duration::seconds(2);
            self.0.mark_checked_in(t, earlier).await?;
            self.0.mark_checked_in(t, at).await
        }
        async fn delete(&self, id: ParticipantId) -> Result<bool, StoreError> {
            self.0.delete(id).await
        }
        async fn admin_exists(&self, u: &str, p: &str) -> Result<bool, StoreError> {
            self.0.admin_exists(u, p).await
        }
    }

    #[tokio::test]
    async fn lost_race_is_reported_as_repeat_scan() {
        let inner = MemoryStore::new().with_participants([participant("AS-2026-0004")]);
        let store = LosesRace(inner.clone());
        let now = Utc::now();

        let outcome = attempt_check_in(&store, "AS-2026-0004", CheckInPolicy::Idempotent, now)
            .await
            .unwrap();
        assert!(outcome.already_checked_in());
        let winner_time = now - chrono::Duration::seconds(2);
        assert_eq!(outcome.participant().unwrap().checked_in_at(), Some(winner_time));
        assert_eq!(inner.snapshot()[0].checked_in_at(), Some(winner_time));
    }
}
