//! # Export Subcommand
//!
//! Writes the CSV export to `--output`, or to the dated default file name
//! (`Participants_Assirou_2026_YYYY-MM-DD.csv`) in the current directory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use accred_client::TicketStore;
use accred_core::{export_file_name, write_csv};

use crate::load_roster;

/// Arguments for the `accred export` subcommand.
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Destination file.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Execute the export subcommand.
pub async fn run_export(args: &ExportArgs, store: &dyn TicketStore, out: &mut dyn Write) -> Result<u8> {
    let participants = load_roster(store).await?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(export_file_name(chrono::Local::now().date_naive())));

    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut sink = BufWriter::new(file);
    write_csv(&participants, &mut sink).context("writing CSV export")?;
    sink.flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    tracing::info!(rows = participants.len(), path = %path.display(), "export written");
    writeln!(out, "Exported {} participants to {}", participants.len(), path.display())?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{output, store};

    #[tokio::test]
    async fn writes_csv_to_requested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        let args = ExportArgs {
            output: Some(path.clone()),
        };
        let mut buf = Vec::new();
        let code = run_export(&args, store().as_ref(), &mut buf).await.unwrap();
        assert_eq!(code, 0);
        assert!(output(buf).starts_with("Exported 2 participants"));

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("AS-2026-1002"));
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = ExportArgs {
            output: Some(dir.path().join("missing").join("export.csv")),
        };
        let mut buf = Vec::new();
        assert!(run_export(&args, store().as_ref(), &mut buf).await.is_err());
    }
}
