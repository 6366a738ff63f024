//! Dashboard statistics over the roster.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::identity::TicketId;
use crate::participant::Participant;

/// Label used for participants without an industry.
pub const UNSPECIFIED_INDUSTRY: &str = "Non spécifié";
/// Number of check-ins listed in [`DashboardStats::recent_check_ins`].
pub const RECENT_CHECK_INS: usize = 8;

/// Participant count for one industry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryCount {
    /// Industry label.
    pub industry: String,
    /// Number of participants.
    pub count: usize,
}

/// One entry of the recent check-in feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCheckIn {
    /// Ticket code.
    pub ticket_id: TicketId,
    /// `"First Last"`.
    pub full_name: String,
    /// Organization.
    pub company: String,
    /// Check-in instant.
    pub checked_in_at: DateTime<Utc>,
}

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Registered participants.
    pub total: usize,
    /// Checked-in participants.
    pub present: usize,
    /// Not yet checked-in participants.
    pub absent: usize,
    /// Counts per industry, largest first, ties by name.
    pub by_industry: Vec<IndustryCount>,
    /// Latest check-ins, newest first.
    pub recent_check_ins: Vec<RecentCheckIn>,
}

impl DashboardStats {
    /// Compute the dashboard from a participant list.
    pub fn compute(participants: &[Participant]) -> Self {
        let total = participants.len();
        let present = participants.iter().filter(|p| p.checked_in()).count();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for p in participants {
            let industry = match p.industry.trim() {
                "" => UNSPECIFIED_INDUSTRY,
                other => other,
            };
            *counts.entry(industry).or_default() += 1;
        }
        let mut by_industry: Vec<IndustryCount> = counts
            .into_iter()
            .map(|(industry, count)| IndustryCount {
                industry: industry.to_string(),
                count,
            })
            .collect();
        by_industry.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.industry.cmp(&b.industry)));

        let mut recent_check_ins: Vec<RecentCheckIn> = participants
            .iter()
            .filter_map(|p| {
                p.checked_in_at().map(|at| RecentCheckIn {
                    ticket_id: p.ticket_id.clone(),
                    full_name: p.full_name(),
                    company: p.company.clone(),
                    checked_in_at: at,
                })
            })
            .collect();
        recent_check_ins.sort_by(|a, b| b.checked_in_at.cmp(&a.checked_in_at));
        recent_check_ins.truncate(RECENT_CHECK_INS);

        Self {
            total,
            present,
            absent: total - present,
            by_industry,
            recent_check_ins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::fixtures::participant;
    use chrono::{Duration, TimeZone};

    #[test]
    fn empty_roster_has_zero_counts() {
        let stats = DashboardStats::compute(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_industry.is_empty());
        assert!(stats.recent_check_ins.is_empty());
    }

    #[test]
    fn counts_presence_and_industries() {
        let mut a = participant("AS-2026-2001");
        a.industry = "Cybersécurité".into();
        let mut b = participant("AS-2026-2002");
        b.industry = "Cybersécurité".into();
        let mut c = participant("AS-2026-2003");
        c.industry = String::new();
        b.check_in(Utc::now());

        let stats = DashboardStats::compute(&[a, b, c]);
        assert_eq!((stats.total, stats.present, stats.absent), (3, 1, 2));
        assert_eq!(stats.by_industry[0].industry, "Cybersécurité");
        assert_eq!(stats.by_industry[0].count, 2);
        assert_eq!(stats.by_industry[1].industry, UNSPECIFIED_INDUSTRY);
    }

    #[test]
    fn recent_check_ins_are_newest_first_and_capped() {
        let base = Utc.with_ymd_and_hms(2026, 3, 5, 8, 0, 0).unwrap();
        let participants: Vec<_> = (0..10)
            .map(|i| {
                let mut p = participant(&format!("AS-2026-30{i:02}"));
                p.check_in(base + Duration::minutes(i));
                p
            })
            .collect();
        let stats = DashboardStats::compute(&participants);
        assert_eq!(stats.recent_check_ins.len(), RECENT_CHECK_INS);
        assert_eq!(stats.recent_check_ins[0].ticket_id.as_str(), "AS-2026-3009");
        assert_eq!(stats.recent_check_ins[7].ticket_id.as_str(), "AS-2026-3002");
    }
}
