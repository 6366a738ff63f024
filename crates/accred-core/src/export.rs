//! # CSV Export
//!
//! Full participant list with fixed French headers. Quoting follows RFC 4180
//! through the `csv` crate: cells containing the delimiter, quotes or line
//! breaks are quoted and embedded quotes are doubled.

use std::collections::BTreeSet;
use std::io::Write;

use chrono::{NaiveDate, SecondsFormat};

use crate::error::ExportError;
use crate::participant::Participant;

/// Column headers, in order.
pub const HEADERS: [&str; 15] = [
    "Ticket ID",
    "Prenom",
    "Nom",
    "Email",
    "Telephone",
    "Entreprise",
    "Fonction",
    "Industrie",
    "Type Interet",
    "Services/Formations Choisis",
    "Opinion",
    "Source Forum",
    "Source Assirou",
    "Date Inscription",
    "Statut Presence",
];

/// Separator for multi-valued cells.
const LIST_SEPARATOR: &str = " | ";

/// Download file name for an export produced on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("Participants_Assirou_2026_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the export into `sink`.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if the sink fails.
pub fn write_csv<W: Write>(participants: &[Participant], sink: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(HEADERS)?;
    for p in participants {
        writer.write_record(row(p))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Render the export into a string.
///
/// # Errors
///
/// Returns an [`ExportError`] if rendering fails.
pub fn to_csv_string(participants: &[Participant]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;
    for p in participants {
        writer.write_record(row(p))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Finalize(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

fn row(p: &Participant) -> [String; 15] {
    [
        p.ticket_id.to_string(),
        p.first_name.clone(),
        p.last_name.clone(),
        p.email.clone(),
        p.phone.clone(),
        p.company.clone(),
        p.job_title.clone(),
        p.industry.clone(),
        p.interest_type.to_string(),
        join(&p.selected_offerings),
        p.opinion.clone(),
        join(&p.referral_forum),
        join(&p.referral_assirou),
        p.registered_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        if p.checked_in() { "Present" } else { "Absent" }.to_string(),
    ]
}

fn join(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
