//! # accred-cli: Operator CLI for the Accreditation Portal
//!
//! Provides the `accred` command-line interface for staff working directly
//! against the participant store.
//!
//! ## Subcommands
//!
//! - `accred participants`: List participants, with the dashboard filters.
//! - `accred stats`: Dashboard statistics.
//! - `accred export`: Write the CSV export to a file.
//! - `accred check-in`: Check in a ticket.
//! - `accred delete`: Delete a participant.
//!
//! The store comes from the same environment variables as the server
//! (`ACCRED_STORE_URL`, `ACCRED_STORE_KEY`, ...). Every command fails
//! when the store is not configured.

pub mod checkin;
pub mod delete;
pub mod export;
pub mod participants;
pub mod stats;

use std::sync::Arc;

use anyhow::{Context, Result};

use accred_client::{PostgrestStore, StoreConfig, TicketStore};
use accred_core::{Participant, Roster, RosterEvent};

/// Open the store configured in the environment.
pub fn connect_store() -> Result<Arc<dyn TicketStore>> {
    let config = StoreConfig::from_env().context("reading store configuration")?;
    connect(config)
}

/// Open the hosted store. Fails when the store is not configured.
pub fn connect(config: Option<StoreConfig>) -> Result<Arc<dyn TicketStore>> {
    let Some(config) = config else {
        anyhow::bail!("ACCRED_STORE_URL is not set");
    };
    let store = PostgrestStore::new(&config).context("connecting to the participant store")?;
    Ok(Arc::new(store))
}

/// Every participant in the store, newest registration first.
pub async fn load_roster(store: &dyn TicketStore) -> Result<Vec<Participant>> {
    let participants = store
        .fetch_all()
        .await
        .context("fetching participants")?;
    let mut roster = Roster::new();
    roster.apply(RosterEvent::Synced {
        participants,
        at: chrono::Utc::now(),
        since: 0,
    });
    Ok(roster.participants().to_vec())
}
