//! # Admin Sessions & Authentication Middleware
//!
//! `POST /v1/admin/login` checks credentials against the store (fail-closed)
//! and issues an opaque bearer token: 32 random alphanumeric characters,
//! held in memory until it expires or is revoked by logout.
//!
//! Every admin route runs behind [`auth_middleware`], which resolves the
//! token to an [`AdminSession`] and injects it into request extensions.
//! Handlers extract it via the `FromRequestParts` impl.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand::distributions::Alphanumeric;
use rand::Rng;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::{AppError, ErrorBody, ErrorDetail};

/// Length of issued session tokens.
pub const TOKEN_LEN: usize = 32;
/// Upper bound on the configured session lifetime (one year).
const MAX_TTL_SECS: i64 = 365 * 24 * 3600;

/// An authenticated admin, available to admin handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    /// Username that logged in.
    pub username: String,
    /// When the session stops being accepted.
    pub expires_at: DateTime<Utc>,
}

struct SessionEntry {
    token: Zeroizing<String>,
    session: AdminSession,
}

/// In-memory session registry shared by all handlers.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<Vec<SessionEntry>>>,
    ttl: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("active", &self.entries.read().len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Constant-time comparison of bearer tokens.
///
/// When lengths differ, performs a dummy comparison so timing does not
/// depend on where the mismatch is.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

impl SessionStore {
    /// Registry issuing sessions valid for `ttl_secs`.
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            ttl: Duration::seconds(i64::try_from(ttl_secs).unwrap_or(MAX_TTL_SECS).min(MAX_TTL_SECS)),
        }
    }

    /// Issue a session for `username` and return its token.
    ///
    /// Expired sessions are purged on every issue.
    pub fn issue(&self, username: &str, now: DateTime<Utc>) -> (String, AdminSession) {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        let session = AdminSession {
            username: username.to_string(),
            expires_at: now + self.ttl,
        };
        let mut entries = self.entries.write();
        entries.retain(|e| e.session.expires_at > now);
        entries.push(SessionEntry {
            token: Zeroizing::new(token.clone()),
            session: session.clone(),
        });
        (token, session)
    }

    /// Resolve `token` to a live session.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Option<AdminSession> {
        // Compare against every entry so timing does not reveal position.
        let mut found = None;
        for entry in self.entries.read().iter() {
            if constant_time_token_eq(token, &entry.token) && entry.session.expires_at > now {
                found = Some(entry.session.clone());
            }
        }
        found
    }

    /// Revoke `token`. Returns whether a session was removed.
    pub fn revoke(&self, token: &str) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| !constant_time_token_eq(token, &e.token));
        entries.len() != before
    }

    /// Number of stored sessions, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no sessions are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bearer token of the current request, for logout.
#[derive(Clone)]
pub struct SessionToken(pub Zeroizing<String>);

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no admin session in request context".into()))
    }
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for SessionToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionToken>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no admin session in request context".into()))
    }
}

/// Require a live admin session.
///
/// Reads the [`SessionStore`] from request extensions. A request without a
/// registry is rejected.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(sessions) = request.extensions().get::<SessionStore>().cloned() else {
        tracing::error!("session store missing from request extensions");
        return unauthorized_response("authentication unavailable");
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(value) if value.starts_with("Bearer ") => {
            let provided = value[7..].trim().to_string();
            match sessions.validate(&provided, Utc::now()) {
                Some(session) => {
                    request.extensions_mut().insert(session);
                    request
                        .extensions_mut()
                        .insert(SessionToken(Zeroizing::new(provided)));
                    next.run(request).await
                }
                None => {
                    tracing::warn!("authentication failed: unknown or expired session");
                    unauthorized_response("invalid or expired session")
                }
            }
        }
        Some(_) => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            unauthorized_response("authorization header must use Bearer scheme")
        }
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
