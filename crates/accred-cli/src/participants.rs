//! # Participants Subcommand
//!
//! Lists participants newest first, one per line:
//!
//! ```text
//! AS-2026-1002  Fatou Ndiaye  Wave  Absent
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use accred_client::TicketStore;
use accred_core::{InterestType, ParticipantFilter, PresenceStatus};

use crate::load_roster;

/// Arguments for the `accred participants` subcommand.
#[derive(Args, Debug, Default)]
pub struct ParticipantsArgs {
    /// Case-insensitive search over name, email, company and ticket.
    #[arg(long)]
    pub query: Option<String>,

    /// Only `present` or `absent` participants.
    #[arg(long)]
    pub status: Option<PresenceStatus>,

    /// Only `services`, `formations` or `none`.
    #[arg(long, value_parser = parse_interest)]
    pub interest: Option<InterestType>,
}

fn parse_interest(s: &str) -> Result<InterestType, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "services" => Ok(InterestType::Services),
        "formations" => Ok(InterestType::Formations),
        "none" => Ok(InterestType::None),
        other => Err(format!("unknown interest {other:?}; expected services, formations or none")),
    }
}

/// Execute the participants subcommand.
pub async fn run_participants(
    args: &ParticipantsArgs,
    store: &dyn TicketStore,
    out: &mut dyn Write,
) -> Result<u8> {
    let participants = load_roster(store).await?;
    let filter = ParticipantFilter {
        query: args.query.clone(),
        status: args.status,
        interest: args.interest,
    };
    let matches = filter.apply(&participants);

    for p in &matches {
        writeln!(
            out,
            "{}  {}  {}  {}",
            p.ticket_id,
            p.full_name(),
            if p.company.is_empty() { "-" } else { p.company.as_str() },
            if p.checked_in() { "Present" } else { "Absent" },
        )
        .context("writing output")?;
    }
    tracing::info!(shown = matches.len(), total = participants.len(), "participants listed");
    Ok(0)
}
