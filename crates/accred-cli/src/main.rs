//! # accred CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use accred_cli::checkin::{run_check_in, CheckInArgs};
use accred_cli::delete::{run_delete, DeleteArgs};
use accred_cli::export::{run_export, ExportArgs};
use accred_cli::participants::{run_participants, ParticipantsArgs};
use accred_cli::stats::run_stats;

/// Accreditation portal operator CLI.
///
/// Works directly against the participant store configured through
/// `ACCRED_STORE_URL` and `ACCRED_STORE_KEY`.
#[derive(Parser, Debug)]
#[command(name = "accred", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List participants, newest first.
    Participants(ParticipantsArgs),

    /// Show dashboard statistics.
    Stats,

    /// Write the participant CSV export.
    Export(ExportArgs),

    /// Check in a ticket.
    CheckIn(CheckInArgs),

    /// Delete a participant.
    Delete(DeleteArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let store = match accred_cli::connect_store() {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Participants(args) => run_participants(args, store.as_ref(), &mut stdout).await,
        Commands::Stats => run_stats(store.as_ref(), &mut stdout).await,
        Commands::Export(args) => run_export(args, store.as_ref(), &mut stdout).await,
        Commands::CheckIn(args) => run_check_in(args, store.as_ref(), &mut stdout).await,
        Commands::Delete(args) => run_delete(args, store.as_ref(), &mut stdout).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
