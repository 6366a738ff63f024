//! # Check-in Subcommand
//!
//! Checks in one ticket. Exit codes: `0` checked in (or already present
//! under the idempotent policy), `1` unknown ticket, `2` refused repeat
//! scan under `--reject-duplicates`.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use accred_client::{attempt_check_in, CheckInError, TicketStore};
use accred_core::{CheckInOutcome, CheckInPolicy};

/// Arguments for the `accred check-in` subcommand.
#[derive(Args, Debug)]
pub struct CheckInArgs {
    /// Ticket code, case-insensitive.
    pub ticket: String,

    /// Refuse tickets that are already checked in.
    #[arg(long)]
    pub reject_duplicates: bool,
}

/// Execute the check-in subcommand.
pub async fn run_check_in(args: &CheckInArgs, store: &dyn TicketStore, out: &mut dyn Write) -> Result<u8> {
    let policy = if args.reject_duplicates {
        CheckInPolicy::RejectDuplicate
    } else {
        CheckInPolicy::Idempotent
    };

    match attempt_check_in(store, &args.ticket, policy, chrono::Utc::now()).await {
        Ok(CheckInOutcome::CheckedIn(p)) => {
            writeln!(out, "Checked in {} ({})", p.full_name(), p.ticket_id)?;
            Ok(0)
        }
        Ok(CheckInOutcome::AlreadyCheckedIn(p)) => {
            let at = p
                .checked_in_at()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            writeln!(out, "{} ({}) already checked in at {at}", p.full_name(), p.ticket_id)?;
            Ok(0)
        }
        Ok(CheckInOutcome::NotFound) => {
            writeln!(out, "Ticket {:?} not found", args.ticket.trim())?;
            Ok(1)
        }
        Err(CheckInError::Duplicate(dup)) => {
            writeln!(out, "Refused: {dup}")?;
            Ok(2)
        }
        Err(e) => Err(e.into()),
    }
}
