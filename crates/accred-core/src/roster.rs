//! # Roster
//!
//! The locally cached snapshot of the store's participants. The store owns
//! the authoritative copy; the roster is refreshed with
//! [`RosterEvent::Synced`] and patched with the other events only after a
//! store write has been confirmed.
//!
//! A snapshot is fetched without holding the roster, so writes confirmed
//! while the fetch was in flight are newer than the snapshot. `Synced`
//! carries the version the fetch started from; records patched after that
//! version keep their cached copy, and a snapshot older than the last
//! applied one is dropped.
//!
//! Every applied event bumps [`Roster::version`]. Freshness is reported
//! through [`RosterStatus`], which marks the snapshot stale once it is older
//! than [`STALE_AFTER_SECS`] or if it was never synced.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::identity::{ParticipantId, TicketId};
use crate::participant::Participant;

/// Age after which a snapshot is reported stale.
pub const STALE_AFTER_SECS: i64 = 300;

/// A named transition of the roster.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterEvent {
    /// Full refetch from the store.
    Synced {
        /// Every participant the store returned.
        participants: Vec<Participant>,
        /// When the fetch completed.
        at: DateTime<Utc>,
        /// Roster version read before the fetch started.
        since: u64,
    },
    /// A registration was persisted.
    Registered(Participant),
    /// A check-in was persisted. Only refreshes an existing entry.
    CheckedIn(Participant),
    /// A participant was deleted from the store.
    Removed(ParticipantId),
}

/// Freshness summary of the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStatus {
    /// Number of applied events.
    pub version: u64,
    /// Completion time of the last full sync.
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Whether the snapshot should be refreshed.
    pub stale: bool,
    /// Number of cached participants.
    pub participants: usize,
}

/// Cached participant list, newest registration first.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<Participant>,
    version: u64,
    last_synced_at: Option<DateTime<Utc>>,
    /// `since` of the last applied snapshot.
    synced_since: u64,
    /// Version at which each record was last patched by a confirmed write.
    patches: HashMap<ParticipantId, Patch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Patch {
    Upserted(u64),
    Removed(u64),
}

impl Patch {
    fn version(self) -> u64 {
        match self {
            Self::Upserted(v) | Self::Removed(v) => v,
        }
    }
}

impl Roster {
    /// An empty, never-synced roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and bump the version.
    ///
    /// Returns `false` when the event was ignored: a snapshot fetched
    /// before the last applied one, or a check-in for a participant that is
    /// not cached.
    pub fn apply(&mut self, event: RosterEvent) -> bool {
        let next = self.version + 1;
        match event {
            RosterEvent::Synced {
                participants,
                at,
                since,
            } => {
                if self.last_synced_at.is_some() && since < self.synced_since {
                    return false;
                }
                self.merge_snapshot(participants, since);
                self.synced_since = since;
                self.last_synced_at = Some(at);
            }
            RosterEvent::Registered(p) => {
                self.patches.insert(p.id, Patch::Upserted(next));
                match self.participants.iter_mut().find(|c| c.id == p.id) {
                    Some(slot) => *slot = p,
                    None => self.participants.push(p),
                }
            }
            RosterEvent::CheckedIn(p) => {
                let Some(slot) = self.participants.iter_mut().find(|c| c.id == p.id) else {
                    return false;
                };
                self.patches.insert(p.id, Patch::Upserted(next));
                *slot = p;
            }
            RosterEvent::Removed(id) => {
                self.patches.insert(id, Patch::Removed(next));
                self.participants.retain(|p| p.id != id);
            }
        }
        self.participants
            .sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        self.version = next;
        true
    }

    /// Replace the cache with `snapshot`, keeping every record a confirmed
    /// write touched after version `since`.
    fn merge_snapshot(&mut self, snapshot: Vec<Participant>, since: u64) {
        self.patches.retain(|_, patch| patch.version() > since);
        let previous = std::mem::take(&mut self.participants);
        let mut cached: HashMap<ParticipantId, Participant> = previous
            .into_iter()
            .filter(|p| self.patches.contains_key(&p.id))
            .map(|p| (p.id, p))
            .collect();

        let mut merged = Vec::with_capacity(snapshot.len() + cached.len());
        for p in snapshot {
            match self.patches.get(&p.id) {
                Some(Patch::Removed(_)) => {}
                Some(Patch::Upserted(_)) => {
                    if let Some(newer) = cached.remove(&p.id) {
                        merged.push(newer);
                    } else {
                        merged.push(p);
                    }
                }
                None => merged.push(p),
            }
        }
        merged.extend(cached.into_values());
        self.participants = merged;
    }

    /// Cached participants, newest registration first.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Cached participant holding `ticket`.
    pub fn find_by_ticket(&self, ticket: &TicketId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.ticket_id == ticket)
    }

    /// Number of applied events.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Completion time of the last full sync.
    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    /// Freshness as of `now`.
    pub fn status(&self, now: DateTime<Utc>) -> RosterStatus {
        let stale = match self.last_synced_at {
            Some(at) => now - at > Duration::seconds(STALE_AFTER_SECS),
            None => true,
        };
        RosterStatus {
            version: self.version,
            last_synced_at: self.last_synced_at,
            stale,
            participants: self.participants.len(),
        }
    }
}
