//! # Stats Subcommand
//!
//! Prints the dashboard figures computed over the whole store.

use std::io::Write;

use anyhow::Result;

use accred_client::TicketStore;
use accred_core::DashboardStats;

use crate::load_roster;

/// Execute the stats subcommand.
pub async fn run_stats(store: &dyn TicketStore, out: &mut dyn Write) -> Result<u8> {
    let participants = load_roster(store).await?;
    let stats = DashboardStats::compute(&participants);

    writeln!(out, "Total:   {}", stats.total)?;
    writeln!(out, "Present: {}", stats.present)?;
    writeln!(out, "Absent:  {}", stats.absent)?;

    if !stats.by_industry.is_empty() {
        writeln!(out)?;
        writeln!(out, "By industry:")?;
        for row in &stats.by_industry {
            writeln!(out, "  {:>4}  {}", row.count, row.industry)?;
        }
    }

    if !stats.recent_check_ins.is_empty() {
        writeln!(out)?;
        writeln!(out, "Latest check-ins:")?;
        for c in &stats.recent_check_ins {
            writeln!(
                out,
                "  {}  {}  {}",
                c.checked_in_at.format("%Y-%m-%d %H:%M"),
                c.ticket_id,
                c.full_name
            )?;
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{output, store};
    use accred_core::TicketId;
    use chrono::Utc;

    #[tokio::test]
    async fn prints_totals_and_latest_check_ins() {
        let store = store();
        store
            .mark_checked_in(&TicketId::normalize("AS-2026-1001").unwrap(), Utc::now())
            .await
            .unwrap();

        let mut buf = Vec::new();
        assert_eq!(run_stats(store.as_ref(), &mut buf).await.unwrap(), 0);
        let text = output(buf);
        assert!(text.contains("Total:   2"));
        assert!(text.contains("Present: 1"));
        assert!(text.contains("Absent:  1"));
        assert!(text.contains("     2  Cybersécurité"));
        assert!(text.contains("AS-2026-1001  Moussa Ndiaye"));
    }
}
