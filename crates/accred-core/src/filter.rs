//! Participant list filtering for the dashboard and the CLI.

use serde::{Deserialize, Serialize};

use crate::participant::{InterestType, Participant};

/// Presence filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// Checked in.
    Present,
    /// Not checked in.
    Absent,
}

impl std::str::FromStr for PresenceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(format!("unknown presence status {other:?}; expected present or absent")),
        }
    }
}

/// Criteria for narrowing the participant list. Empty criteria match all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantFilter {
    /// Case-insensitive substring of name, email, company or ticket.
    pub query: Option<String>,
    /// Presence status.
    pub status: Option<PresenceStatus>,
    /// Interest family.
    pub interest: Option<InterestType>,
}

impl ParticipantFilter {
    /// Whether `participant` satisfies every criterion.
    pub fn matches(&self, participant: &Participant) -> bool {
        if let Some(status) = self.status {
            let present = participant.checked_in();
            if present != (status == PresenceStatus::Present) {
                return false;
            }
        }
        if let Some(interest) = self.interest {
            if participant.interest_type != interest {
                return false;
            }
        }
        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => {
                let q = q.to_lowercase();
                [
                    participant.first_name.as_str(),
                    participant.last_name.as_str(),
                    participant.email.as_str(),
                    participant.company.as_str(),
                    participant.ticket_id.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&q))
                    || participant.full_name().to_lowercase().contains(&q)
            }
        }
    }

    /// Participants matching the filter, in their original order.
    pub fn apply<'a>(&self, participants: &'a [Participant]) -> Vec<&'a Participant> {
        participants.iter().filter(|p| self.matches(p)).collect()
    }
}
