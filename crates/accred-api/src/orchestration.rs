//! # Write Orchestration
//!
//! Every operation that changes participant data goes through here:
//!
//! ```text
//! handler → store write → confirmed? → RosterEvent → metrics
//! ```
//!
//! The roster only changes after the store confirms. A failed write
//! leaves the cached roster exactly as it was.

use chrono::Utc;

use accred_client::attempt_check_in;
use accred_core::{CheckInOutcome, Participant, ParticipantId, RegistrationForm, RosterEvent, RosterStatus};

use crate::error::AppError;
use crate::state::AppState;

/// Validate and persist a registration, then add it to the roster.
pub async fn register(state: &AppState, form: RegistrationForm) -> Result<Participant, AppError> {
    let participant = state.registrar.submit(form, Utc::now()).await?;
    state.apply(RosterEvent::Registered(participant.clone()));
    state.metrics.record_registration();
    Ok(participant)
}

/// Check in the ticket typed or scanned as `input` under the configured
/// policy.
///
/// First check-ins and repeat scans both refresh the roster entry from the
/// store's copy; only first check-ins are counted.
pub async fn check_in(state: &AppState, input: &str) -> Result<CheckInOutcome, AppError> {
    let outcome = attempt_check_in(
        state.store.as_ref(),
        input,
        state.config.check_in_policy,
        Utc::now(),
    )
    .await?;

    if let Some(participant) = outcome.participant() {
        state.apply(RosterEvent::CheckedIn(participant.clone()));
    }
    if matches!(outcome, CheckInOutcome::CheckedIn(_)) {
        state.metrics.record_check_in();
    }
    Ok(outcome)
}

/// Delete a participant from the store, then from the roster.
pub async fn delete_participant(state: &AppState, id: ParticipantId) -> Result<(), AppError> {
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound(format!("participant {id} not found")));
    }
    tracing::info!(participant_id = %id, "participant deleted");
    state.apply(RosterEvent::Removed(id));
    Ok(())
}

/// Refetch the roster from the store.
pub async fn sync(state: &AppState) -> Result<RosterStatus, AppError> {
    Ok(state.sync_roster().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use accred_client::{MemoryStore, StoreError, TicketStore, WelcomeWriter};
    use accred_core::{CheckInPolicy, InterestType, TicketId};
    use chrono::DateTime;
    use tokio::sync::Notify;

    use crate::state::AppConfig;

    fn form() -> RegistrationForm {
        RegistrationForm {
            first_name: "Awa".into(),
            last_name: "Diop".into(),
            email: "awa.diop@example.sn".into(),
            phone: "771234567".into(),
            company: "Sonatel".into(),
            job_title: "DSI".into(),
            industry: "Télécommunications".into(),
            interest_type: InterestType::Services,
            ..RegistrationForm::default()
        }
    }

    fn state_with(policy: CheckInPolicy) -> (AppState, MemoryStore) {
        let store = MemoryStore::new();
        let config = AppConfig {
            check_in_policy: policy,
            ..AppConfig::default()
        };
        let state = AppState::with_store(config, Arc::new(store.clone()), WelcomeWriter::fallback_only());
        (state, store)
    }

    #[tokio::test]
    async fn registration_reaches_store_and_roster() {
        let (state, store) = state_with(CheckInPolicy::Idempotent);
        let p = register(&state, form()).await.unwrap();
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(state.participants(), vec![p]);
        assert_eq!(state.metrics.snapshot().registrations, 1);
    }

    #[tokio::test]
    async fn invalid_registration_changes_nothing() {
        let (state, store) = state_with(CheckInPolicy::Idempotent);
        let mut bad = form();
        bad.email = "not-an-email".into();
        let err = register(&state, bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.snapshot().is_empty());
        assert_eq!(state.roster.read().version(), 0);
    }

    #[tokio::test]
    async fn check_in_updates_roster_and_counts_once() {
        let (state, _store) = state_with(CheckInPolicy::Idempotent);
        let p = register(&state, form()).await.unwrap();
        let input = format!("  {}  ", p.ticket_id.as_str().to_lowercase());

        let first = check_in(&state, &input).await.unwrap();
        assert!(matches!(first, CheckInOutcome::CheckedIn(_)));
        assert!(state.participants()[0].checked_in());

        let second = check_in(&state, &input).await.unwrap();
        assert!(second.already_checked_in());
        assert_eq!(
            second.participant().and_then(Participant::checked_in_at),
            first.participant().and_then(Participant::checked_in_at)
        );
        assert_eq!(state.metrics.snapshot().check_ins, 1);
    }

    #[tokio::test]
    async fn rejected_duplicate_maps_to_conflict() {
        let (state, _store) = state_with(CheckInPolicy::RejectDuplicate);
        let p = register(&state, form()).await.unwrap();
        check_in(&state, p.ticket_id.as_str()).await.unwrap();
        let err = check_in(&state, p.ticket_id.as_str()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_unknown_participant_is_not_found() {
        let (state, _store) = state_with(CheckInPolicy::Idempotent);
        let err = delete_participant(&state, ParticipantId::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_from_roster() {
        let (state, store) = state_with(CheckInPolicy::Idempotent);
        let p = register(&state, form()).await.unwrap();
        delete_participant(&state, p.id).await.unwrap();
        assert!(state.participants().is_empty());
        assert!(store.snapshot().is_empty());
    }

    /// Store whose `fetch_all` reads its snapshot, then waits for `release`.
    struct PausedFetch {
        inner: MemoryStore,
        fetched: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[axum::async_trait]
    impl TicketStore for PausedFetch {
        async fn fetch_all(&self) -> Result<Vec<Participant>, StoreError> {
            let snapshot = self.inner.fetch_all().await?;
            self.fetched.notify_one();
            self.release.notified().await;
            Ok(snapshot)
        }

        async fn find_by_ticket(&self, ticket: &TicketId) -> Result<Option<Participant>, StoreError> {
            self.inner.find_by_ticket(ticket).await
        }

        async fn insert(&self, participant: &Participant) -> Result<Participant, StoreError> {
            self.inner.insert(participant).await
        }

        async fn mark_checked_in(
            &self,
            ticket: &TicketId,
            at: DateTime<Utc>,
        ) -> Result<Option<Participant>, StoreError> {
            self.inner.mark_checked_in(ticket, at).await
        }

        async fn delete(&self, id: ParticipantId) -> Result<bool, StoreError> {
            self.inner.delete(id).await
        }

        async fn admin_exists(&self, username: &str, password: &str) -> Result<bool, StoreError> {
            self.inner.admin_exists(username, password).await
        }
    }

    fn paused_state() -> (AppState, MemoryStore, Arc<Notify>, Arc<Notify>) {
        let inner = MemoryStore::new();
        let fetched = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let store = PausedFetch {
            inner: inner.clone(),
            fetched: fetched.clone(),
            release: release.clone(),
        };
        let state = AppState::with_store(AppConfig::default(), Arc::new(store), WelcomeWriter::fallback_only());
        (state, inner, fetched, release)
    }

    #[tokio::test]
    async fn writes_during_sync_survive_the_snapshot() {
        let (state, inner, fetched, release) = paused_state();
        let present = register(&state, form()).await.unwrap();
        let removed = register(&state, form()).await.unwrap();

        let syncing = tokio::spawn({
            let state = state.clone();
            async move { state.sync_roster().await }
        });
        fetched.notified().await;

        check_in(&state, present.ticket_id.as_str()).await.unwrap();
        delete_participant(&state, removed.id).await.unwrap();
        let late = register(&state, form()).await.unwrap();
        release.notify_one();
        let status = syncing.await.unwrap().unwrap();

        assert!(!status.stale);
        assert_eq!(state.participants().len(), inner.snapshot().len());
        let roster = state.roster.read();
        assert!(roster.find_by_ticket(&present.ticket_id).unwrap().checked_in());
        assert!(roster.find_by_ticket(&removed.ticket_id).is_none());
        assert!(roster.find_by_ticket(&late.ticket_id).is_some());
    }

    #[tokio::test]
    async fn check_in_after_delete_does_not_restore_entry() {
        let (state, _store) = state_with(CheckInPolicy::Idempotent);
        let mut p = register(&state, form()).await.unwrap();
        delete_participant(&state, p.id).await.unwrap();

        p.check_in(Utc::now());
        assert!(!state.apply(RosterEvent::CheckedIn(p)));
        assert!(state.participants().is_empty());
    }
}
