//! # Participant Record
//!
//! One registration, as stored in the hosted database's `participants`
//! table. The wire shape is camelCase with separate `checkedIn` and
//! `checkedInAt` columns; in memory those two collapse into [`Attendance`].
//!
//! Stored text columns may be `NULL` for optional fields and are read back
//! as empty strings. Multi-valued columns are sets: order is irrelevant and
//! duplicates collapse.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::identity::{ParticipantId, TicketId};
use crate::registration::ValidatedRegistration;

/// Which family of offerings the participant is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestType {
    /// Security services.
    Services,
    /// Training programmes.
    Formations,
    /// No particular interest.
    #[default]
    None,
}

impl InterestType {
    /// Return the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Formations => "formations",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for InterestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check-in state of a participant.
///
/// `Present` carries the moment of the first accepted check-in, which is
/// never overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attendance {
    /// Not checked in yet.
    #[default]
    Absent,
    /// Checked in at the given instant.
    Present {
        /// When the check-in was recorded.
        at: DateTime<Utc>,
    },
}

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParticipantRecord", into = "ParticipantRecord")]
pub struct Participant {
    /// Store key.
    pub id: ParticipantId,
    /// Public ticket code.
    pub ticket_id: TicketId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone, digits only.
    pub phone: String,
    /// Organization, possibly empty.
    pub company: String,
    /// Job title, possibly empty.
    pub job_title: String,
    /// Industry sector, possibly empty.
    pub industry: String,
    /// Interest family.
    pub interest_type: InterestType,
    /// Offerings selected within the interest family.
    pub selected_offerings: BTreeSet<String>,
    /// Free-text opinion about the forum.
    pub opinion: String,
    /// How the participant heard about the forum.
    pub referral_forum: BTreeSet<String>,
    /// How the participant heard about the organizer.
    pub referral_assirou: BTreeSet<String>,
    /// Registration instant, immutable.
    pub registered_at: DateTime<Utc>,
    /// Greeting attached at registration, never regenerated.
    pub welcome_message: Option<String>,
    attendance: Attendance,
}

impl Participant {
    /// Build a fresh, not-yet-checked-in participant from a validated form.
    pub fn from_registration(
        registration: ValidatedRegistration,
        ticket_id: TicketId,
        welcome_message: String,
        registered_at: DateTime<Utc>,
    ) -> Self {
        let form = registration.into_form();
        Self {
            id: ParticipantId::new(),
            ticket_id,
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone: form.phone,
            company: form.company,
            job_title: form.job_title,
            industry: form.industry,
            interest_type: form.interest_type,
            selected_offerings: form.selected_offerings,
            opinion: form.opinion,
            referral_forum: form.referral_forum,
            referral_assirou: form.referral_assirou,
            registered_at,
            welcome_message: Some(welcome_message),
            attendance: Attendance::Absent,
        }
    }

    /// `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Current check-in state.
    pub fn attendance(&self) -> Attendance {
        self.attendance
    }

    /// Whether the participant has been checked in.
    pub fn checked_in(&self) -> bool {
        matches!(self.attendance, Attendance::Present { .. })
    }

    /// When the participant was checked in, if they were.
    pub fn checked_in_at(&self) -> Option<DateTime<Utc>> {
        match self.attendance {
            Attendance::Present { at } => Some(at),
            Attendance::Absent => None,
        }
    }

    /// Record a check-in at `at`.
    ///
    /// Returns `false` and leaves the record untouched if the participant
    /// is already present; the first timestamp wins.
    pub fn check_in(&mut self, at: DateTime<Utc>) -> bool {
        match self.attendance {
            Attendance::Present { .. } => false,
            Attendance::Absent => {
                self.attendance = Attendance::Present { at };
                true
            }
        }
    }
}

// -- Wire representation ------------------------------------------------------

/// Row shape of the `participants` table.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantRecord {
    id: ParticipantId,
    ticket_id: TicketId,
    #[serde(default, deserialize_with = "nullable_string")]
    first_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    last_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    phone: String,
    #[serde(default, deserialize_with = "nullable_string")]
    company: String,
    #[serde(default, deserialize_with = "nullable_string")]
    job_title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    industry: String,
    #[serde(default)]
    interest_type: InterestType,
    #[serde(default, deserialize_with = "nullable_set")]
    selected_offerings: BTreeSet<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    opinion: String,
    #[serde(default, deserialize_with = "nullable_set")]
    referral_forum: BTreeSet<String>,
    #[serde(default, deserialize_with = "nullable_set")]
    referral_assirou: BTreeSet<String>,
    registered_at: DateTime<Utc>,
    #[serde(default)]
    welcome_message: Option<String>,
    #[serde(default)]
    checked_in: bool,
    #[serde(default)]
    checked_in_at: Option<DateTime<Utc>>,
}

impl TryFrom<ParticipantRecord> for Participant {
    type Error = ValidationError;

    fn try_from(r: ParticipantRecord) -> Result<Self, Self::Error> {
        let attendance = match (r.checked_in, r.checked_in_at) {
            (true, Some(at)) => Attendance::Present { at },
            (false, None) => Attendance::Absent,
            _ => {
                return Err(ValidationError::InconsistentAttendance {
                    ticket_id: r.ticket_id.to_string(),
                })
            }
        };
        Ok(Self {
            id: r.id,
            ticket_id: r.ticket_id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone: r.phone,
            company: r.company,
            job_title: r.job_title,
            industry: r.industry,
            interest_type: r.interest_type,
            selected_offerings: r.selected_offerings,
            opinion: r.opinion,
            referral_forum: r.referral_forum,
            referral_assirou: r.referral_assirou,
            registered_at: r.registered_at,
            welcome_message: r.welcome_message,
            attendance,
        })
    }
}

impl From<Participant> for ParticipantRecord {
    fn from(p: Participant) -> Self {
        let checked_in_at = p.checked_in_at();
        Self {
            id: p.id,
            ticket_id: p.ticket_id,
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            phone: p.phone,
            company: p.company,
            job_title: p.job_title,
            industry: p.industry,
            interest_type: p.interest_type,
            selected_offerings: p.selected_offerings,
            opinion: p.opinion,
            referral_forum: p.referral_forum,
            referral_assirou: p.referral_assirou,
            registered_at: p.registered_at,
            welcome_message: p.welcome_message,
            checked_in: checked_in_at.is_some(),
            checked_in_at,
        }
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn nullable_set<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeSet<String>, D::Error> {
    Ok(Option::<BTreeSet<String>>::deserialize(d)?.unwrap_or_default())
}
