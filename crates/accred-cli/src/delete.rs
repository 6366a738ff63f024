//! Delete subcommand: removes one participant by store id.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use accred_client::TicketStore;
use accred_core::ParticipantId;

/// Arguments for the `accred delete` subcommand.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Participant UUID.
    pub id: Uuid,
}

/// Execute the delete subcommand. Exits `1` when nothing matched.
pub async fn run_delete(args: &DeleteArgs, store: &dyn TicketStore, out: &mut dyn Write) -> Result<u8> {
    let id = ParticipantId::from_uuid(args.id);
    if store
        .delete(id)
        .await
        .with_context(|| format!("deleting participant {id}"))?
    {
        tracing::info!(participant_id = %id, "participant deleted");
        writeln!(out, "Deleted participant {id}")?;
        Ok(0)
    } else {
        writeln!(out, "Participant {id} not found")?;
        Ok(1)
    }
}
