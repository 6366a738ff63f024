//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! - **Store**: the authoritative participant store, behind
//!   [`TicketStore`]. Every write goes there first.
//! - **Roster**: the locally cached snapshot, owned here and changed only
//!   through [`RosterEvent`]s applied after a store write confirms.
//! - **Sessions**: admin bearer tokens, in memory.
//!
//! The roster lock is `parking_lot` and is never held across an `.await`.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use url::Url;

use accred_client::config::{qr_service_url_from_env, ConfigError, DEFAULT_QR_SERVICE_URL};
use accred_client::{MemoryStore, QrLinks, Registrar, StoreError, TicketStore, WelcomeWriter};
use accred_core::identity::DEFAULT_TICKET_PREFIX;
use accred_core::{CheckInPolicy, Participant, Roster, RosterEvent, RosterStatus, TicketIssuer};

use crate::auth::SessionStore;
use crate::middleware::metrics::ApiMetrics;

/// Default admin session lifetime (12 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 43_200;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Issuer for new ticket codes.
    pub ticket_issuer: TicketIssuer,
    /// How repeat check-ins are reported.
    pub check_in_policy: CheckInPolicy,
    /// Admin session lifetime in seconds.
    pub session_ttl_secs: u64,
    /// QR rendering service.
    pub qr_service_url: Url,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            ticket_issuer: TicketIssuer::default(),
            check_in_policy: CheckInPolicy::default(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            qr_service_url: Url::parse(DEFAULT_QR_SERVICE_URL)
                .unwrap_or_else(|_| unreachable!("default QR service URL is valid")),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `TICKET_PREFIX` (default: `AS-2026`)
    /// - `CHECKIN_POLICY` (`idempotent` | `reject`, default: `idempotent`)
    /// - `SESSION_TTL_SECS` (default: 43200)
    /// - `QR_SERVICE_URL` (default: `https://api.qrserver.com/v1/create-qr-code/`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let prefix = std::env::var("TICKET_PREFIX").unwrap_or_else(|_| DEFAULT_TICKET_PREFIX.into());
        let ticket_issuer = TicketIssuer::new(&prefix).map_err(|e| ConfigError::InvalidValue {
            var: "TICKET_PREFIX".into(),
            message: e.to_string(),
        })?;

        let check_in_policy = match std::env::var("CHECKIN_POLICY") {
            Ok(raw) => raw.parse().map_err(|e: accred_core::ValidationError| {
                ConfigError::InvalidValue {
                    var: "CHECKIN_POLICY".into(),
                    message: e.to_string(),
                }
            })?,
            Err(_) => CheckInPolicy::default(),
        };

        let session_ttl_secs = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        Ok(Self {
            port,
            ticket_issuer,
            check_in_policy,
            session_ttl_secs,
            qr_service_url: qr_service_url_from_env()?,
        })
    }
}

/// Shared application state. Cloning is cheap: every field is a handle.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn TicketStore>,
    pub registrar: Registrar,
    pub qr: QrLinks,
    pub roster: Arc<RwLock<Roster>>,
    pub sessions: SessionStore,
    pub metrics: ApiMetrics,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("roster_version", &self.roster.read().version())
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State backed by an empty in-memory store and the fallback welcome
    /// template. Used by tests and local runs.
    pub fn new() -> Self {
        Self::with_store(
            AppConfig::default(),
            Arc::new(MemoryStore::new()),
            WelcomeWriter::fallback_only(),
        )
    }

    /// State over an explicit store and welcome writer.
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn TicketStore>,
        welcome: WelcomeWriter,
    ) -> Self {
        let registrar = Registrar::new(store.clone(), welcome, config.ticket_issuer.clone());
        Self {
            qr: QrLinks::new(config.qr_service_url.clone()),
            sessions: SessionStore::new(config.session_ttl_secs),
            registrar,
            store,
            roster: Arc::new(RwLock::new(Roster::new())),
            metrics: ApiMetrics::new(),
            config,
        }
    }

    /// Apply a roster event. Returns `false` if the roster ignored it.
    pub fn apply(&self, event: RosterEvent) -> bool {
        self.roster.write().apply(event)
    }

    /// Copy of the cached participants, newest registration first.
    pub fn participants(&self) -> Vec<Participant> {
        self.roster.read().participants().to_vec()
    }

    /// Roster freshness as of now.
    pub fn roster_status(&self) -> RosterStatus {
        self.roster.read().status(Utc::now())
    }

    /// Refetch every participant from the store and replace the roster.
    ///
    /// Writes confirmed while the fetch is in flight survive the snapshot.
    /// On failure the roster is left untouched.
    pub async fn sync_roster(&self) -> Result<RosterStatus, StoreError> {
        let since = self.roster.read().version();
        let participants = self.store.fetch_all().await?;
        let at = Utc::now();
        let count = participants.len();
        if self.apply(RosterEvent::Synced {
            participants,
            at,
            since,
        }) {
            tracing::info!(participants = count, since, "roster synced");
        } else {
            tracing::debug!(since, "older roster snapshot dropped");
        }
        Ok(self.roster_status())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sync_replaces_roster_and_marks_fresh() {
        let state = AppState::new();
        assert!(state.roster_status().stale);
        let status = state.sync_roster().await.unwrap();
        assert!(!status.stale);
        assert_eq!(status.version, 1);
        assert_eq!(status.participants, 0);
    }

    #[test]
    fn default_config_matches_documented_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.ticket_issuer.prefix(), "AS-2026");
        assert_eq!(cfg.check_in_policy, CheckInPolicy::Idempotent);
        assert_eq!(cfg.session_ttl_secs, 43_200);
    }
}
